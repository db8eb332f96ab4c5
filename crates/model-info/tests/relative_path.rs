//! Changes the working directory, so it lives in its own test binary.

mod common;

use std::path::Path;

use common::qwen2;
use gguf_parser::DEFAULT_SCAN_LIMIT;
use model_info::Extractor;

#[test]
fn relative_path_is_recorded_as_absolute() {
    let dir = tempfile::tempdir().unwrap();
    qwen2().write(dir.path(), "rel.gguf", None);
    std::env::set_current_dir(dir.path()).unwrap();

    let record = Extractor::new(DEFAULT_SCAN_LIMIT).extract(Path::new("rel.gguf"));
    assert!(record.path.is_absolute(), "{}", record.path.display());
    assert!(record.path.ends_with("rel.gguf"));
    assert_eq!(record.filename, "rel.gguf");
    assert_eq!(record.architecture, "qwen2");

    let missing = Extractor::new(DEFAULT_SCAN_LIMIT).extract(Path::new("gone.gguf"));
    assert!(missing.path.is_absolute());
    assert_eq!(missing.error.as_deref(), Some("file not found"));
}

mod common;

use std::path::Path;
use std::sync::Arc;

use common::{GgufBuilder, Val, qwen2};
use gguf_parser::{DEFAULT_SCAN_LIMIT, FieldValue};
use model_info::extract::NO_CAPABILITY_WARNING;
use model_info::{Extractor, MetadataSet, MetadataSource, SourceError, StructuredReader, UNKNOWN};

/// Stands in for the llama.cpp loader.
struct FixedSource(MetadataSet);

impl MetadataSource for FixedSource {
    fn name(&self) -> &'static str {
        "fixed"
    }
    fn read(&self, _path: &Path) -> Result<MetadataSet, SourceError> {
        Ok(self.0.clone())
    }
}

struct PanickingSource;

impl MetadataSource for PanickingSource {
    fn name(&self) -> &'static str {
        "panicking"
    }
    fn read(&self, _path: &Path) -> Result<MetadataSet, SourceError> {
        panic!("loader blew up")
    }
}

fn structured_only() -> Extractor {
    Extractor::with_sources(vec![Arc::new(StructuredReader::new(DEFAULT_SCAN_LIMIT))])
}

#[test]
fn end_to_end_summary() {
    let dir = tempfile::tempdir().unwrap();
    let size = (4.2 * (1u64 << 30) as f64) as u64;
    let path = qwen2().write(dir.path(), "Qwen-7B-Q4_K_M.gguf", Some(size));

    let record = Extractor::new(DEFAULT_SCAN_LIMIT).extract(&path);

    assert_eq!(record.file_size_bytes, size);
    assert_eq!(record.model_name, "Qwen2 7B");
    assert_eq!(record.embedding_length, Some(3584));
    assert_eq!(record.head_count, Some(28));
    assert_eq!(
        record.summary(),
        "Arch: qwen2 │ Layers: 28 │ Ctx: 32K │ Size: 4.2 GB │ Quant: Q4_K_M"
    );
}

#[test]
fn architecture_stored_as_byte_array_is_decoded() {
    let dir = tempfile::tempdir().unwrap();
    let path = GgufBuilder::new()
        .kv("general.architecture", Val::Bytes(b"llama"))
        .kv("llama.block_count", Val::U64(32))
        .write(dir.path(), "model.gguf", None);

    let record = structured_only().extract(&path);
    assert_eq!(record.architecture, "llama");
    assert_eq!(record.layer_count, Some(32));
    assert_eq!(record.context_length, None);
}

#[test]
fn file_type_code_used_when_filename_has_no_token() {
    let dir = tempfile::tempdir().unwrap();
    let path = qwen2().write(dir.path(), "qwen2-7b.gguf", None);

    let record = structured_only().extract(&path);
    assert_eq!(record.quantization, "Q4_K_M");
}

#[test]
fn architecture_key_wins_over_generic_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = GgufBuilder::new()
        .kv("general.architecture", Val::Str("llama"))
        .kv("general.context_length", Val::U32(2048))
        .kv("llama.context_length", Val::U32(8192))
        .write(dir.path(), "m.gguf", None);

    assert_eq!(structured_only().extract(&path).context_length, Some(8192));
}

#[test]
fn falls_back_when_structured_reader_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken-Q8_0.gguf");
    std::fs::write(&path, b"not a gguf file at all").unwrap();

    let fallback: MetadataSet = [
        ("general.architecture", FieldValue::Str("llama".into())),
        ("llama.block_count", FieldValue::Int(16)),
    ]
    .into_iter()
    .collect();
    let extractor = Extractor::with_sources(vec![
        Arc::new(StructuredReader::default()),
        Arc::new(FixedSource(fallback)),
    ]);

    let record = extractor.extract(&path);
    assert!(record.error.is_none());
    assert!(record.warning.is_none());
    assert_eq!(record.file_size_bytes, 22);
    assert_eq!(record.architecture, "llama");
    assert_eq!(record.layer_count, Some(16));
    assert_eq!(record.quantization, "Q8_0");
}

#[test]
fn every_strategy_failing_is_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("junk-q5_k_m.gguf");
    std::fs::write(&path, b"GGUF").unwrap();

    let extractor = Extractor::with_sources(vec![
        Arc::new(StructuredReader::default()),
        Arc::new(PanickingSource),
    ]);
    let record = extractor.extract(&path);

    assert!(record.error.is_none());
    let warning = record.warning.as_deref().unwrap();
    assert!(warning.contains("structured:"), "{warning}");
    assert!(warning.contains("panicking: panicked: loader blew up"), "{warning}");
    assert_eq!(record.file_size_bytes, 4);
    assert_eq!(record.architecture, UNKNOWN);
    assert_eq!(record.quantization, "Q5_K_M");
}

#[test]
fn no_capability_available() {
    let dir = tempfile::tempdir().unwrap();
    let path = qwen2().write(dir.path(), "Qwen-7B-Q4_K_M.gguf", None);

    let record = Extractor::with_sources(Vec::new()).extract(&path);
    assert!(record.error.is_none());
    assert_eq!(record.warning.as_deref(), Some(NO_CAPABILITY_WARNING));
    assert!(record.file_size_bytes > 0);
    assert_eq!(record.layer_count, None);
    assert_eq!(record.quantization, "Q4_K_M");
}

#[test]
fn missing_file_sets_error_only() {
    let dir = tempfile::tempdir().unwrap();
    let record = structured_only().extract(&dir.path().join("gone.gguf"));
    assert_eq!(record.error.as_deref(), Some("file not found"));
    assert!(record.warning.is_none());
    assert_eq!(record.architecture, UNKNOWN);
}

fn truncated_qwen2(dir: &Path, name: &str) -> std::path::PathBuf {
    let bytes = qwen2().to_bytes();
    // cuts into the key of the last entry
    let path = dir.join(name);
    std::fs::write(&path, &bytes[..bytes.len() - 40]).unwrap();
    path
}

#[test]
fn truncated_table_falls_back_to_next_strategy() {
    let dir = tempfile::tempdir().unwrap();
    let path = truncated_qwen2(dir.path(), "qwen2-7b.gguf");

    let fallback: MetadataSet = [
        ("general.architecture", FieldValue::Str("qwen2".into())),
        ("qwen2.block_count", FieldValue::Int(28)),
    ]
    .into_iter()
    .collect();
    let extractor = Extractor::with_sources(vec![
        Arc::new(StructuredReader::default()),
        Arc::new(FixedSource(fallback)),
    ]);

    let record = extractor.extract(&path);
    assert!(record.warning.is_none());
    assert_eq!(record.architecture, "qwen2");
    assert_eq!(record.layer_count, Some(28));
}

#[test]
fn truncated_table_alone_is_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let path = truncated_qwen2(dir.path(), "qwen2-7b.gguf");

    let record = structured_only().extract(&path);
    assert!(record.error.is_none());
    let warning = record.warning.as_deref().unwrap();
    assert!(warning.starts_with("metadata unavailable (structured: "), "{warning}");
    assert!(warning.contains("truncated"), "{warning}");
    assert_eq!(record.architecture, UNKNOWN);
}

#[cfg(unix)]
#[test]
fn unreadable_directory_is_permission_denied() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let locked = dir.path().join("locked");
    std::fs::create_dir(&locked).unwrap();
    let path = qwen2().write(&locked, "m.gguf", None);
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    // root ignores the mode bits
    let privileged = std::fs::metadata(&path).is_ok();
    let record = structured_only().extract(&path);
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
    if privileged {
        return;
    }

    assert_eq!(record.error.as_deref(), Some("permission denied"));
    assert!(record.warning.is_none());
    assert_eq!(record.file_size_bytes, 0);
}

//! Finding model files to analyse.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// `*.gguf` files directly inside `dir`, sorted by file name.
///
/// A missing directory yields an empty list.
pub fn list_models(dir: &Path) -> io::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut models = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_gguf_extension(&path) {
            models.push(path);
        }
    }
    models.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    debug!(dir = %dir.display(), count = models.len(), "model directory listed");
    Ok(models)
}

/// Models whose file name contains every whitespace-separated term of
/// `query`, case-insensitively. An empty query keeps everything.
pub fn filter_models<'a>(models: &'a [PathBuf], query: &str) -> Vec<&'a PathBuf> {
    let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    models
        .iter()
        .filter(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            terms.iter().all(|term| name.contains(term.as_str()))
        })
        .collect()
}

fn has_gguf_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gguf"))
}

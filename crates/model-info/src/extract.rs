//! Strategy fallback chain producing a [`MetadataRecord`].

use std::any::Any;
use std::fs;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::record::MetadataRecord;
use crate::resolve::MetadataSet;
use crate::source::{MetadataSource, SourceError, default_sources};

/// Warning attached when no strategy is compiled in or enabled.
pub const NO_CAPABILITY_WARNING: &str = "no metadata extraction capability available";

/// Runs the configured strategies in priority order.
///
/// [`Extractor::extract`] never fails: only a failed `stat` of the file
/// yields a record with `error`; strategy failures fall through to the
/// next strategy and, if all fail, end up in `warning`.
#[derive(Clone)]
pub struct Extractor {
    sources: Vec<Arc<dyn MetadataSource>>,
}

impl Extractor {
    /// Every strategy compiled into this build.
    pub fn new(scan_limit: u64) -> Self {
        Self::with_sources(default_sources(scan_limit))
    }

    pub fn with_sources(sources: Vec<Arc<dyn MetadataSource>>) -> Self {
        debug!(
            sources = ?sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            "extractor configured"
        );
        Self { sources }
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Records always carry an absolute path; relative input is resolved
    /// against the working directory.
    pub fn extract(&self, path: &Path) -> MetadataRecord {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let path = absolute.as_path();
        let file_size = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot stat model file");
                return MetadataRecord::failed(path, describe_io_error(&e));
            }
        };

        if self.sources.is_empty() {
            warn!(path = %path.display(), "{NO_CAPABILITY_WARNING}");
            return MetadataRecord::degraded(path, file_size, NO_CAPABILITY_WARNING);
        }

        let mut failures = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            match read_guarded(source.as_ref(), path) {
                Ok(metadata) => {
                    info!(
                        path = %path.display(),
                        strategy = source.name(),
                        keys = metadata.len(),
                        "metadata extracted"
                    );
                    return MetadataRecord::from_metadata(path, file_size, &metadata);
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        strategy = source.name(),
                        error = %e,
                        "extraction strategy failed"
                    );
                    failures.push(format!("{}: {e}", source.name()));
                }
            }
        }

        MetadataRecord::degraded(
            path,
            file_size,
            format!("metadata unavailable ({})", failures.join("; ")),
        )
    }
}

/// A panicking strategy counts as a failed one.
fn read_guarded(source: &dyn MetadataSource, path: &Path) -> Result<MetadataSet, SourceError> {
    panic::catch_unwind(AssertUnwindSafe(|| source.read(path))).unwrap_or_else(|payload| {
        Err(SourceError::Other(format!(
            "panicked: {}",
            panic_message(payload.as_ref())
        )))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

fn describe_io_error(e: &io::Error) -> String {
    match e.kind() {
        io::ErrorKind::NotFound => "file not found".to_string(),
        io::ErrorKind::PermissionDenied => "permission denied".to_string(),
        _ => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_to_fixed_messages() {
        let nf = io::Error::from(io::ErrorKind::NotFound);
        let pd = io::Error::from(io::ErrorKind::PermissionDenied);
        assert_eq!(describe_io_error(&nf), "file not found");
        assert_eq!(describe_io_error(&pd), "permission denied");
    }

    #[test]
    fn missing_file_is_fatal() {
        let extractor = Extractor::with_sources(Vec::new());
        let record = extractor.extract(Path::new("/definitely/not/here.gguf"));
        assert_eq!(record.error.as_deref(), Some("file not found"));
        assert!(record.warning.is_none());
    }
}

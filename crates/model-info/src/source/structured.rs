use std::path::Path;

use gguf_parser::decode_field;
use tracing::{debug, trace};

use super::{MetadataSource, SourceError};
use crate::resolve::MetadataSet;

/// Parses the GGUF key/value table directly, never touching tensor data.
#[derive(Debug, Clone)]
pub struct StructuredReader {
    scan_limit: u64,
}

impl StructuredReader {
    pub fn new(scan_limit: u64) -> Self {
        Self { scan_limit }
    }
}

impl Default for StructuredReader {
    fn default() -> Self {
        Self::new(gguf_parser::DEFAULT_SCAN_LIMIT)
    }
}

impl MetadataSource for StructuredReader {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn read(&self, path: &Path) -> Result<MetadataSet, SourceError> {
        let parsed = gguf_parser::read_metadata(path, self.scan_limit)?;
        if !parsed.complete {
            debug!(
                path = %path.display(),
                read = parsed.metadata.len(),
                total = parsed.header.metadata_kv_count,
                "scan limit reached before end of metadata table"
            );
        }

        let mut set = MetadataSet::new();
        for kv in &parsed.metadata {
            match decode_field(&kv.value) {
                Some(value) => set.push(kv.key.clone(), value),
                None => trace!(key = %kv.key, value_type = ?kv.value_type, "field treated as absent"),
            }
        }
        Ok(set)
    }
}

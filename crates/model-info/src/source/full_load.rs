use std::path::Path;

use gguf_parser::FieldValue;
use llama_core::{LlamaBackend, LlamaModel, ModelParams};
use tracing::debug;

use super::{MetadataSource, SourceError};
use crate::resolve::MetadataSet;

/// Opens the model through llama.cpp (vocabulary only, no GPU layers, no
/// context) and reads the metadata table llama.cpp reports.
pub struct FullLoader {
    params: ModelParams,
}

impl FullLoader {
    pub fn new() -> Self {
        Self {
            params: ModelParams::metadata_only(),
        }
    }
}

impl Default for FullLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataSource for FullLoader {
    fn name(&self) -> &'static str {
        "full-load"
    }

    fn read(&self, path: &Path) -> Result<MetadataSet, SourceError> {
        let _backend = LlamaBackend::init();
        let model = LlamaModel::load_from_file(path, &self.params)?;
        let entries = model.metadata()?;
        debug!(path = %path.display(), entries = entries.len(), "llama.cpp metadata read");

        Ok(entries
            .into_iter()
            .map(|(key, value)| (key, FieldValue::from_text(&value)))
            .collect())
    }
}

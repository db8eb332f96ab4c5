//! Metadata extraction strategies.
//!
//! Each strategy reads a model file's metadata table into a
//! [`MetadataSet`]; interpreting that table is left to the caller so all
//! strategies feed the same resolution logic.

mod structured;
#[cfg(feature = "full-load")]
mod full_load;

use std::path::Path;
use std::sync::Arc;

use crate::resolve::MetadataSet;

pub use structured::StructuredReader;
#[cfg(feature = "full-load")]
pub use full_load::FullLoader;

/// One way of reading a model's metadata table.
pub trait MetadataSource: Send + Sync {
    /// Short name used in logs and warnings.
    fn name(&self) -> &'static str;

    fn read(&self, path: &Path) -> Result<MetadataSet, SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Gguf(#[from] gguf_parser::GGUFError),

    #[cfg(feature = "full-load")]
    #[error(transparent)]
    Llama(#[from] llama_core::LlamaError),

    #[error("{0}")]
    Other(String),
}

/// The strategies compiled into this build, highest priority first.
pub fn default_sources(scan_limit: u64) -> Vec<Arc<dyn MetadataSource>> {
    #[allow(unused_mut)]
    let mut sources: Vec<Arc<dyn MetadataSource>> =
        vec![Arc::new(StructuredReader::new(scan_limit))];
    #[cfg(feature = "full-load")]
    sources.push(Arc::new(FullLoader::new()));
    sources
}

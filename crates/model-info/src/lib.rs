//! Model metadata extraction for GGUF files.
//!
//! Produces a [`MetadataRecord`] (architecture, layer count, context
//! length, embedding width, head count, quantisation, file size) for a
//! model file without loading its weights:
//!
//! * [`Extractor`] runs the compiled-in [`MetadataSource`]s in priority
//!   order and never fails; problems surface as `error` / `warning`.
//! * [`AnalysisScheduler`] runs extractions off the caller's task and
//!   drops results that a newer selection has superseded.

pub mod discovery;
pub mod extract;
pub mod quant;
pub mod record;
pub mod resolve;
pub mod scheduler;
pub mod source;
pub mod summary;

pub use extract::Extractor;
pub use quant::{QUANT_CATALOG, infer_quantization};
pub use record::{MetadataRecord, UNKNOWN};
pub use resolve::{MetadataSet, SemanticField, resolve};
pub use scheduler::AnalysisScheduler;
pub use source::{MetadataSource, SourceError, StructuredReader, default_sources};

#[cfg(feature = "full-load")]
pub use source::FullLoader;

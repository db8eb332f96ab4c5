//! Safe Rust wrapper around the llama.cpp C API, limited to what is
//! needed to read a model's metadata table through llama.cpp's own loader.

pub mod backend;
pub mod error;
pub mod model;

pub use backend::LlamaBackend;
pub use error::{LlamaError, Result};
pub use model::{LlamaModel, ModelParams};

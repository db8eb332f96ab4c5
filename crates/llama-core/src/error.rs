use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlamaError {
    #[error("Failed to load model from '{path}': {reason}")]
    ModelLoadFailed { path: String, reason: String },

    #[error("Metadata entry {index} could not be read")]
    MetadataUnreadable { index: i32 },
}

pub type Result<T> = std::result::Result<T, LlamaError>;

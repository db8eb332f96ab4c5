//! Pure-Rust GGUF metadata parser.
//!
//! Reads the header and key/value table of a `.gguf` file **without**
//! touching tensor data and without depending on llama.cpp, then
//! normalises raw values into [`FieldValue`]s.

pub mod decode;
pub mod reader;
pub mod types;

pub use decode::{FieldValue, decode_field};
pub use reader::{DEFAULT_SCAN_LIMIT, GGUFMetadata, parse_metadata, read_metadata};
pub use types::{
    GGUFError, GGUFHeader, GGUFMetadataKV, GGUFValue, GGUFValueType, file_type_name,
};

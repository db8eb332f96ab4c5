//! GGUF format types and constants.

use serde::{Deserialize, Serialize};

/// Magic bytes `GGUF` (little-endian).
pub const GGUF_MAGIC: u32 = 0x4655_4747;

/// Oldest GGUF version we understand (v1 uses 32-bit lengths).
pub const GGUF_VERSION_MIN: u32 = 1;

/// Maximum GGUF version we support.
pub const GGUF_VERSION_MAX: u32 = 3;

//  Value type tag

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum GGUFValueType {
    Uint8 = 0,
    Int8 = 1,
    Uint16 = 2,
    Int16 = 3,
    Uint32 = 4,
    Int32 = 5,
    Float32 = 6,
    Bool = 7,
    String = 8,
    Array = 9,
    Uint64 = 10,
    Int64 = 11,
    Float64 = 12,
}

impl TryFrom<u32> for GGUFValueType {
    type Error = GGUFError;
    fn try_from(v: u32) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::Uint8),
            1 => Ok(Self::Int8),
            2 => Ok(Self::Uint16),
            3 => Ok(Self::Int16),
            4 => Ok(Self::Uint32),
            5 => Ok(Self::Int32),
            6 => Ok(Self::Float32),
            7 => Ok(Self::Bool),
            8 => Ok(Self::String),
            9 => Ok(Self::Array),
            10 => Ok(Self::Uint64),
            11 => Ok(Self::Int64),
            12 => Ok(Self::Float64),
            _ => Err(GGUFError::InvalidValueType(v)),
        }
    }
}

//  Header

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GGUFHeader {
    pub version: u32,
    pub tensor_count: u64,
    pub metadata_kv_count: u64,
}

//  Metadata KV

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GGUFMetadataKV {
    pub key: String,
    pub value_type: GGUFValueType,
    pub value: GGUFValue,
}

/// A raw metadata value exactly as stored in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GGUFValue {
    Uint8(u8),
    Int8(i8),
    Uint16(u16),
    Int16(i16),
    Uint32(u32),
    Int32(i32),
    Float32(f32),
    Bool(bool),
    String(String),
    Array(Vec<GGUFValue>),
    Uint64(u64),
    Int64(i64),
    Float64(f64),
}

impl GGUFValue {
    /// Any integer variant, widened losslessly.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Self::Uint8(v) => Some(i128::from(*v)),
            Self::Int8(v) => Some(i128::from(*v)),
            Self::Uint16(v) => Some(i128::from(*v)),
            Self::Int16(v) => Some(i128::from(*v)),
            Self::Uint32(v) => Some(i128::from(*v)),
            Self::Int32(v) => Some(i128::from(*v)),
            Self::Uint64(v) => Some(i128::from(*v)),
            Self::Int64(v) => Some(i128::from(*v)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

//  Error

#[derive(Debug, thiserror::Error)]
pub enum GGUFError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid GGUF magic: 0x{0:08X}")]
    InvalidMagic(u32),

    #[error("Unsupported GGUF version: {0}")]
    UnsupportedVersion(u32),

    #[error("Invalid value type tag: {0}")]
    InvalidValueType(u32),

    #[error("Truncated header (file too small)")]
    TruncatedHeader,

    #[error("Metadata table truncated after {read} of {declared} entries")]
    TruncatedMetadata { read: usize, declared: u64 },

    #[error("{0}")]
    Other(String),
}

//  File-type ↔ human name

/// Map a `general.file_type` value to a short quantisation name.
pub fn file_type_name(ft: u32) -> Option<&'static str> {
    let name = match ft {
        0 => "F32",
        1 => "F16",
        2 => "Q4_0",
        3 => "Q4_1",
        7 => "Q8_0",
        8 => "Q5_0",
        9 => "Q5_1",
        10 => "Q2_K",
        11 => "Q3_K_S",
        12 => "Q3_K_M",
        13 => "Q3_K_L",
        14 => "Q4_K_S",
        15 => "Q4_K_M",
        16 => "Q5_K_S",
        17 => "Q5_K_M",
        18 => "Q6_K",
        19 => "IQ2_XXS",
        20 => "IQ2_XS",
        21 => "Q2_K_S",
        22 => "IQ3_XS",
        23 => "IQ3_XXS",
        24 => "IQ1_S",
        25 => "IQ4_NL",
        26 => "IQ3_S",
        27 => "IQ3_M",
        28 => "IQ2_S",
        29 => "IQ2_M",
        30 => "IQ4_XS",
        31 => "IQ1_M",
        32 => "BF16",
        _ => return None,
    };
    Some(name)
}

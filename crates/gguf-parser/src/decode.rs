//! Normalisation of raw metadata values.
//!
//! Quantised models often store short strings as `uint8`/`int8` arrays,
//! which are indistinguishable from genuine integer arrays by type tag.
//! [`decode_field`] tells them apart by content: a byte array that decodes
//! to text containing at least one letter is returned as a string.

use serde::{Deserialize, Serialize};

use crate::types::GGUFValue;

/// A decoded metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Non-negative integer view. Integral floats are accepted since some
    /// converters write dimensions as `float32`.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Int(v) => u64::try_from(*v).ok(),
            Self::Float(v) if *v >= 0.0 && v.fract() == 0.0 && *v <= u64::MAX as f64 => {
                Some(*v as u64)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Interpret a value that only exists in textual form (e.g. as reported
    /// by llama.cpp's `meta_val_str`).
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if let Ok(v) = trimmed.parse::<i64>() {
            Self::Int(v)
        } else if let Ok(v) = trimmed.parse::<f64>()
            && v.is_finite()
        {
            Self::Float(v)
        } else {
            match trimmed {
                "true" => Self::Bool(true),
                "false" => Self::Bool(false),
                _ => Self::Str(text.to_string()),
            }
        }
    }
}

/// Decode a raw value. `None` means "treat the field as absent".
pub fn decode_field(raw: &GGUFValue) -> Option<FieldValue> {
    match raw {
        GGUFValue::Uint8(_)
        | GGUFValue::Int8(_)
        | GGUFValue::Uint16(_)
        | GGUFValue::Int16(_)
        | GGUFValue::Uint32(_)
        | GGUFValue::Int32(_)
        | GGUFValue::Uint64(_)
        | GGUFValue::Int64(_) => raw
            .as_integer()
            .and_then(|v| i64::try_from(v).ok())
            .map(FieldValue::Int),
        GGUFValue::Float32(v) => Some(FieldValue::Float(f64::from(*v))),
        GGUFValue::Float64(v) => Some(FieldValue::Float(*v)),
        GGUFValue::Bool(v) => Some(FieldValue::Bool(*v)),
        GGUFValue::String(s) => Some(FieldValue::Str(s.clone())),
        GGUFValue::Array(items) => decode_array(items),
    }
}

fn decode_array(items: &[GGUFValue]) -> Option<FieldValue> {
    match items {
        [] => None,
        [single] => decode_field(single),
        _ => {
            if let Some(bytes) = as_byte_string(items) {
                let text = String::from_utf8_lossy(&bytes);
                if text.chars().any(char::is_alphabetic) {
                    return Some(FieldValue::Str(text.into_owned()));
                }
            }
            items
                .iter()
                .map(decode_field)
                .collect::<Option<Vec<_>>>()
                .map(FieldValue::List)
        }
    }
}

/// All elements are integers in `0..=255`.
fn as_byte_string(items: &[GGUFValue]) -> Option<Vec<u8>> {
    items
        .iter()
        .map(|v| v.as_integer().and_then(|i| u8::try_from(i).ok()))
        .collect()
}

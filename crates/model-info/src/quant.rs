//! Quantisation label inference.
//!
//! A token in the filename takes precedence over the file's own
//! `general.file_type` code.

use gguf_parser::file_type_name;

use crate::record::UNKNOWN;

/// Known quantisation tokens. Earlier entries win when several occur in
/// the same filename.
pub const QUANT_CATALOG: [&str; 20] = [
    "Q8_0", "Q6_K", "Q5_K_M", "Q5_K_S", "Q5_0", "Q5_1", "Q4_K_M", "Q4_K_S", "Q4_0", "Q4_1",
    "Q3_K_M", "Q3_K_S", "Q3_K_L", "Q2_K", "IQ4_XS", "IQ3_XXS", "IQ2_XXS", "F16", "F32", "BF16",
];

/// Catalog token contained in `filename`, ignoring case and accepting `-`
/// in place of `_`.
pub fn quant_from_filename(filename: &str) -> Option<&'static str> {
    let upper = filename.to_uppercase();
    QUANT_CATALOG
        .iter()
        .copied()
        .find(|token| upper.contains(token) || upper.contains(&token.replace('_', "-")))
}

/// Filename match first, then the numeric file-type code, else `"unknown"`.
pub fn infer_quantization(filename: &str, file_type: Option<u32>) -> String {
    if let Some(token) = quant_from_filename(filename) {
        return token.to_string();
    }
    match file_type {
        Some(code) => file_type_name(code)
            .map(String::from)
            .unwrap_or_else(|| format!("type {code}")),
        None => UNKNOWN.to_string(),
    }
}

//! One-line human-readable rendering of a [`MetadataRecord`].

use std::fmt;

use crate::record::{MetadataRecord, UNKNOWN};

pub const SEPARATOR: &str = " │ ";

const GIB: f64 = (1u64 << 30) as f64;

impl MetadataRecord {
    /// `Arch: qwen2 │ Layers: 28 │ Ctx: 32K │ Size: 4.2 GB │ Quant: Q4_K_M`
    ///
    /// Unknown fields are left out; the size is always shown. A warning is
    /// appended as the last segment.
    pub fn summary(&self) -> String {
        if let Some(error) = &self.error {
            return format!("Error: {error}");
        }

        let mut parts = Vec::with_capacity(6);
        if self.architecture != UNKNOWN {
            parts.push(format!("Arch: {}", self.architecture));
        }
        if let Some(layers) = self.layer_count {
            parts.push(format!("Layers: {layers}"));
        }
        if let Some(ctx) = self.context_length {
            parts.push(format!("Ctx: {}", format_context(ctx)));
        }
        parts.push(format!("Size: {} GB", format_gib(self.file_size_bytes)));
        if self.quantization != UNKNOWN {
            parts.push(format!("Quant: {}", self.quantization));
        }
        if let Some(warning) = &self.warning {
            parts.push(format!("Warning: {warning}"));
        }
        parts.join(SEPARATOR)
    }
}

impl fmt::Display for MetadataRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

fn format_context(ctx: u64) -> String {
    if ctx >= 1024 {
        format!("{}K", ctx / 1024)
    } else {
        ctx.to_string()
    }
}

/// Size in GiB rounded to two decimals, without trailing zeros (`4.2`,
/// `0.07`, `13.0`).
fn format_gib(bytes: u64) -> String {
    let gib = (bytes as f64 / GIB * 100.0).round() / 100.0;
    if gib.fract() == 0.0 {
        format!("{gib:.1}")
    } else {
        format!("{gib}")
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn record() -> MetadataRecord {
        MetadataRecord::unresolved(Path::new("Qwen-7B-Q4_K_M.gguf"), (4.2 * GIB) as u64)
    }

    #[test]
    fn full_summary() {
        let mut r = record();
        r.architecture = "qwen2".into();
        r.layer_count = Some(28);
        r.context_length = Some(32768);
        r.quantization = "Q4_K_M".into();
        assert_eq!(
            r.summary(),
            "Arch: qwen2 │ Layers: 28 │ Ctx: 32K │ Size: 4.2 GB │ Quant: Q4_K_M"
        );
    }

    #[test]
    fn degrades_to_size_only() {
        assert_eq!(record().summary(), "Size: 4.2 GB");
    }

    #[test]
    fn warning_is_always_appended() {
        let r = MetadataRecord::degraded(Path::new("x.gguf"), 1 << 30, "no luck");
        assert_eq!(r.summary(), "Size: 1.0 GB │ Warning: no luck");
    }

    #[test]
    fn small_context_is_not_abbreviated() {
        let mut r = record();
        r.context_length = Some(512);
        assert_eq!(r.summary(), "Ctx: 512 │ Size: 4.2 GB");
    }

    #[test]
    fn error_record_renders_error() {
        let r = MetadataRecord::failed(Path::new("x.gguf"), "permission denied");
        assert_eq!(r.to_string(), "Error: permission denied");
    }

    #[test]
    fn gib_rounding() {
        assert_eq!(format_gib(0), "0.0");
        assert_eq!(format_gib(75_161_928), "0.07");
        assert_eq!(format_gib(13 << 30), "13.0");
    }
}

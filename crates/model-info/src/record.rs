//! The extraction result handed to callers.

use std::path::{Path, PathBuf};

use gguf_parser::FieldValue;
use serde::{Serialize, Serializer};

use crate::quant::infer_quantization;
use crate::resolve::{MetadataSet, SemanticField, resolve_u64};

/// Placeholder for any field that could not be determined.
pub const UNKNOWN: &str = "unknown";

/// Summary of one model file.
///
/// A record either carries `error` (the file could not even be stat'ed;
/// every model field is unknown) or a best-effort set of fields, possibly
/// with a `warning` explaining why some of them are unknown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataRecord {
    pub path: PathBuf,
    pub filename: String,
    pub file_size_bytes: u64,
    pub architecture: String,
    pub model_name: String,
    #[serde(serialize_with = "known_or_unknown")]
    pub context_length: Option<u64>,
    #[serde(serialize_with = "known_or_unknown")]
    pub layer_count: Option<u64>,
    #[serde(serialize_with = "known_or_unknown")]
    pub embedding_length: Option<u64>,
    #[serde(serialize_with = "known_or_unknown")]
    pub head_count: Option<u64>,
    pub quantization: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MetadataRecord {
    /// Only path-derived fields and the size; everything else unknown.
    pub fn unresolved(path: &Path, file_size_bytes: u64) -> Self {
        let filename = filename_of(path);
        Self {
            path: path.to_path_buf(),
            model_name: filename.clone(),
            filename,
            file_size_bytes,
            architecture: UNKNOWN.to_string(),
            context_length: None,
            layer_count: None,
            embedding_length: None,
            head_count: None,
            quantization: UNKNOWN.to_string(),
            warning: None,
            error: None,
        }
    }

    /// Fatal failure: nothing but the path and the error message.
    pub fn failed(path: &Path, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::unresolved(path, 0)
        }
    }

    /// Degraded result: size and a filename-based quantisation guess.
    pub fn degraded(path: &Path, file_size_bytes: u64, warning: impl Into<String>) -> Self {
        let mut record = Self::unresolved(path, file_size_bytes);
        record.quantization = infer_quantization(&record.filename, None);
        record.warning = Some(warning.into());
        record
    }

    /// Interpret a metadata table read from `path`.
    pub fn from_metadata(path: &Path, file_size_bytes: u64, metadata: &MetadataSet) -> Self {
        let mut record = Self::unresolved(path, file_size_bytes);
        let arch = metadata.architecture();

        if let Some(arch) = arch {
            record.architecture = arch.to_string();
        }
        if let Some(name) = metadata
            .get("general.name")
            .and_then(FieldValue::as_str)
            .filter(|s| !s.trim().is_empty())
        {
            record.model_name = name.to_string();
        }

        record.context_length = resolve_u64(metadata, SemanticField::ContextLength, arch);
        record.layer_count = resolve_u64(metadata, SemanticField::BlockCount, arch);
        record.embedding_length = resolve_u64(metadata, SemanticField::EmbeddingLength, arch);
        record.head_count = resolve_u64(metadata, SemanticField::HeadCount, arch);

        let file_type = metadata
            .get("general.file_type")
            .and_then(FieldValue::as_u64)
            .and_then(|v| u32::try_from(v).ok());
        record.quantization = infer_quantization(&record.filename, file_type);

        record
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

fn filename_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn known_or_unknown<S: Serializer>(value: &Option<u64>, s: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => s.serialize_u64(*v),
        None => s.serialize_str(UNKNOWN),
    }
}

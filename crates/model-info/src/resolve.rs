//! Architecture-aware lookup of semantic fields in a metadata table.

use gguf_parser::FieldValue;
use tracing::trace;

/// Decoded metadata in the source's native enumeration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataSet {
    entries: Vec<(String, FieldValue)>,
}

impl MetadataSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: FieldValue) {
        self.entries.push((key.into(), value));
    }

    /// First entry with exactly this key.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn architecture(&self) -> Option<&str> {
        self.get("general.architecture")
            .and_then(FieldValue::as_str)
            .filter(|s| !s.is_empty())
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for MetadataSet {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Model dimensions looked up per architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticField {
    ContextLength,
    BlockCount,
    EmbeddingLength,
    HeadCount,
}

impl SemanticField {
    pub const ALL: [SemanticField; 4] = [
        Self::ContextLength,
        Self::BlockCount,
        Self::EmbeddingLength,
        Self::HeadCount,
    ];

    /// Key below the architecture namespace (`<arch>.<key>`).
    pub fn key(self) -> &'static str {
        match self {
            Self::ContextLength => "context_length",
            Self::BlockCount => "block_count",
            Self::EmbeddingLength => "embedding_length",
            Self::HeadCount => "attention.head_count",
        }
    }

    /// Substring used by the last-resort scan over all keys.
    pub fn needle(self) -> &'static str {
        match self {
            Self::HeadCount => "head_count",
            other => other.key(),
        }
    }

    fn generic_alias(self) -> Option<&'static str> {
        match self {
            Self::ContextLength => Some("general.context_length"),
            Self::EmbeddingLength => Some("general.embedding_length"),
            Self::BlockCount | Self::HeadCount => None,
        }
    }
}

/// Find `field` in `set`, trying in order:
///
/// 1. `<architecture>.<key>`
/// 2. the `general.*` alias, for fields that have one
/// 3. the first key (in enumeration order) containing the field's needle
///
/// The scan in step 3 does not disambiguate between several matching keys
/// (e.g. a vision tower's `block_count` next to the text model's); the
/// first one wins.
pub fn resolve<'a>(
    set: &'a MetadataSet,
    field: SemanticField,
    architecture: Option<&str>,
) -> Option<&'a FieldValue> {
    if let Some(arch) = architecture
        && let Some(v) = set.get(&format!("{arch}.{}", field.key()))
    {
        return Some(v);
    }

    if let Some(alias) = field.generic_alias()
        && let Some(v) = set.get(alias)
    {
        trace!(?field, alias, "resolved via generic alias");
        return Some(v);
    }

    let needle = field.needle();
    set.iter().find(|(k, _)| k.contains(needle)).map(|(k, v)| {
        trace!(?field, key = k, "resolved via key scan");
        v
    })
}

/// [`resolve`] narrowed to a non-negative integer.
pub fn resolve_u64(set: &MetadataSet, field: SemanticField, architecture: Option<&str>) -> Option<u64> {
    resolve(set, field, architecture).and_then(FieldValue::as_u64)
}

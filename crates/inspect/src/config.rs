//! Application configuration, persisted as JSON.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Global configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory searched by `list` and `select` when `--dir` is absent.
    #[serde(default)]
    pub models_dir: Option<PathBuf>,
    /// Bytes of metadata the structured reader scans at most.
    #[serde(default = "default_scan_limit")]
    pub scan_limit: u64,
    /// Try the pure-Rust reader before llama.cpp.
    #[serde(default = "default_true")]
    pub structured_reader: bool,
}

fn default_scan_limit() -> u64 {
    gguf_parser::DEFAULT_SCAN_LIMIT
}
fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            models_dir: None,
            scan_limit: default_scan_limit(),
            structured_reader: true,
        }
    }
}

impl AppConfig {
    /// Platform config directory: `~/.config/gguf-inspect/`
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gguf-inspect")
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Load from disk, or return defaults if the file doesn't exist.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let path = Self::config_file();
        if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let dir = Self::config_dir();
        std::fs::create_dir_all(&dir)?;
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(Self::config_file(), data)?;
        Ok(())
    }

    /// Apply a `config set <key> <value>` edit.
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "models_dir" => {
                self.models_dir = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "scan_limit" => self.scan_limit = value.parse()?,
            "structured_reader" => self.structured_reader = value.parse()?,
            _ => anyhow::bail!("Unknown config key: {key}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: AppConfig = serde_json::from_str(r#"{"models_dir": "/models"}"#).unwrap();
        assert_eq!(cfg.models_dir, Some(PathBuf::from("/models")));
        assert_eq!(cfg.scan_limit, gguf_parser::DEFAULT_SCAN_LIMIT);
        assert!(cfg.structured_reader);
    }

    #[test]
    fn set_parses_values() {
        let mut cfg = AppConfig::default();
        cfg.set("scan_limit", "1024").unwrap();
        cfg.set("structured_reader", "false").unwrap();
        cfg.set("models_dir", "/m").unwrap();
        assert_eq!(cfg.scan_limit, 1024);
        assert!(!cfg.structured_reader);
        assert_eq!(cfg.models_dir, Some(PathBuf::from("/m")));

        cfg.set("models_dir", "").unwrap();
        assert_eq!(cfg.models_dir, None);
        assert!(cfg.set("port", "1").is_err());
        assert!(cfg.set("scan_limit", "lots").is_err());
    }
}

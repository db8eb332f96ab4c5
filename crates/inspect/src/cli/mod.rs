pub mod config_cmd;
pub mod info;
pub mod list;
pub mod select;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use model_info::{Extractor, default_sources};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(
    name = "gguf-inspect",
    version,
    about = "Inspect GGUF model metadata without loading the weights"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Args, Clone)]
pub struct GlobalArgs {
    /// Maximum bytes of metadata to scan (overrides config).
    #[arg(long, global = true, env = "GGUF_SCAN_LIMIT")]
    pub scan_limit: Option<u64>,

    /// Skip the pure-Rust reader and use only llama.cpp (if built in).
    #[arg(long, global = true)]
    pub no_structured: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show metadata for one GGUF file.
    Info(InfoArgs),

    /// Summarise every model in a directory.
    List(ListArgs),

    /// Interactively pick models; results of superseded picks are dropped.
    Select(SelectArgs),

    /// View / edit configuration.
    Config(ConfigArgs),
}

//  Subcommand argument structs

#[derive(Debug, clap::Args, Clone)]
pub struct InfoArgs {
    /// Path to the GGUF file.
    pub path: PathBuf,

    /// Print the full record as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct ListArgs {
    /// Directory to scan (overrides config).
    #[arg(long, env = "GGUF_MODELS_DIR")]
    pub dir: Option<PathBuf>,

    /// Only models whose name contains every term.
    #[arg(long, default_value = "")]
    pub filter: String,

    /// Print records as a JSON array.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct SelectArgs {
    /// Directory that bare names and search terms refer to.
    #[arg(long, env = "GGUF_MODELS_DIR")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Display the current configuration.
    Show,
    /// Set a configuration value.
    Set { key: String, value: String },
}

//  Shared helpers

/// Extractor for the compiled-in strategies, minus any disabled by
/// flags or config.
pub fn build_extractor(global: &GlobalArgs, cfg: &AppConfig) -> Arc<Extractor> {
    let scan_limit = global.scan_limit.unwrap_or(cfg.scan_limit);
    let use_structured = cfg.structured_reader && !global.no_structured;
    let sources = default_sources(scan_limit)
        .into_iter()
        .filter(|s| use_structured || s.name() != "structured")
        .collect();
    Arc::new(Extractor::with_sources(sources))
}

/// `--dir`, then the configured directory, then the working directory.
pub fn models_dir(arg: Option<PathBuf>, cfg: &AppConfig) -> PathBuf {
    arg.or_else(|| cfg.models_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

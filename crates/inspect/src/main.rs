mod cli;
mod config;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    //  Logging (stderr keeps stdout for results)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,gguf_inspect=info")),
        )
        .init();

    let args = cli::Cli::parse();

    match args.command {
        cli::Commands::Info(a) => cli::info::execute(args.global, a).await,
        cli::Commands::List(a) => cli::list::execute(args.global, a).await,
        cli::Commands::Select(a) => cli::select::execute(args.global, a).await,
        cli::Commands::Config(c) => cli::config_cmd::execute(c).await,
    }
}

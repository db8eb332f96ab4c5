use crate::cli::{GlobalArgs, InfoArgs, build_extractor};
use crate::config::AppConfig;

pub async fn execute(global: GlobalArgs, args: InfoArgs) -> anyhow::Result<()> {
    let cfg = AppConfig::load_or_default()?;
    let extractor = build_extractor(&global, &cfg);

    let path = args.path.clone();
    let record = tokio::task::spawn_blocking(move || extractor.extract(&path)).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("{}", record.filename);
        println!("  {record}");
        if record.error.is_none() {
            println!("  Model name:      {}", record.model_name);
            println!("  Embedding width: {}", known(record.embedding_length));
            println!("  Attention heads: {}", known(record.head_count));
        }
    }

    if let Some(error) = record.error {
        anyhow::bail!("{}: {error}", args.path.display());
    }
    Ok(())
}

fn known(value: Option<u64>) -> String {
    value.map_or_else(|| model_info::UNKNOWN.to_string(), |v| v.to_string())
}

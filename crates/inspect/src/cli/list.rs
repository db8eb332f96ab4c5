use model_info::discovery::{filter_models, list_models};

use crate::cli::{GlobalArgs, ListArgs, build_extractor, display_name, models_dir};
use crate::config::AppConfig;

pub async fn execute(global: GlobalArgs, args: ListArgs) -> anyhow::Result<()> {
    let cfg = AppConfig::load_or_default()?;
    let dir = models_dir(args.dir, &cfg);
    if !dir.is_dir() {
        anyhow::bail!("{} is not a directory", dir.display());
    }

    let models = list_models(&dir)?;
    let selected: Vec<_> = filter_models(&models, &args.filter)
        .into_iter()
        .cloned()
        .collect();

    if selected.is_empty() {
        println!("No GGUF models found in {}", dir.display());
        return Ok(());
    }

    let extractor = build_extractor(&global, &cfg);
    let records = tokio::task::spawn_blocking(move || {
        selected
            .iter()
            .map(|path| extractor.extract(path))
            .collect::<Vec<_>>()
    })
    .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    for record in &records {
        println!("{:<48} {record}", display_name(&record.path));
    }
    if args.filter.trim().is_empty() {
        println!("\n{} model(s) found.", records.len());
    } else {
        println!("\nShowing {} of {} model(s).", records.len(), models.len());
    }
    let failed = records.iter().filter(|r| r.is_error()).count();
    if failed > 0 {
        println!("{failed} model(s) could not be read.");
    }
    Ok(())
}

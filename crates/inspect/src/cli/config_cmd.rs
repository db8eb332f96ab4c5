use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::AppConfig;

pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    let mut cfg = AppConfig::load_or_default()?;
    match args.action {
        ConfigAction::Show => {
            println!("# {}", AppConfig::config_file().display());
            println!("{}", serde_json::to_string_pretty(&cfg)?);
        }
        ConfigAction::Set { key, value } => {
            cfg.set(&key, &value)?;
            cfg.save()?;
            println!("Configuration updated.");
        }
    }
    Ok(())
}

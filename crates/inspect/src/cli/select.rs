use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use model_info::AnalysisScheduler;
use model_info::discovery::{filter_models, list_models};
use tokio::sync::mpsc;
use tracing::debug;

use crate::cli::{GlobalArgs, SelectArgs, build_extractor, display_name, models_dir};
use crate::config::AppConfig;

/// What a line of input picked.
#[derive(Debug, PartialEq)]
enum Selection {
    Model(PathBuf),
    Ambiguous(Vec<PathBuf>),
    NoMatch,
}

pub async fn execute(global: GlobalArgs, args: SelectArgs) -> anyhow::Result<()> {
    let cfg = AppConfig::load_or_default()?;
    let dir = models_dir(args.dir, &cfg);
    let models = list_models(&dir)?;
    let mut scheduler = AnalysisScheduler::new(build_extractor(&global, &cfg));

    println!(
        "{} model(s) in {}. Enter a path, file name or search terms (Ctrl-D to quit).",
        models.len(),
        dir.display()
    );

    let (tx, mut lines) = mpsc::channel::<String>(16);
    tokio::task::spawn_blocking(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match resolve_selection(line, &dir, &models) {
                    Selection::Model(path) => {
                        let name = display_name(&path);
                        if scheduler.submit(path) {
                            println!("Analyzing {name}...");
                        }
                    }
                    Selection::Ambiguous(matches) => {
                        println!("{} models match \"{line}\":", matches.len());
                        for path in matches {
                            println!("  {}", display_name(&path));
                        }
                    }
                    Selection::NoMatch => println!("No model matches \"{line}\"."),
                }
            }
            Some(record) = scheduler.next_record(), if !scheduler.is_idle() => {
                println!("{}: {record}", record.filename);
            }
        }
    }

    // Input closed; finish whatever was picked last.
    if let Some(record) = scheduler.next_record().await {
        println!("{}: {record}", record.filename);
    }
    debug!("select finished");
    Ok(())
}

fn resolve_selection(line: &str, dir: &Path, models: &[PathBuf]) -> Selection {
    let direct = Path::new(line);
    if direct.is_file() {
        return Selection::Model(direct.to_path_buf());
    }
    let in_dir = dir.join(line);
    if in_dir.is_file() {
        return Selection::Model(in_dir);
    }

    let mut matches: Vec<PathBuf> = filter_models(models, line).into_iter().cloned().collect();
    match matches.len() {
        0 => Selection::NoMatch,
        1 => Selection::Model(matches.remove(0)),
        _ => Selection::Ambiguous(matches),
    }
}

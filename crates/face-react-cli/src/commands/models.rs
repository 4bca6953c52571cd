//! Models command - manage ML models.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use clap::{Args, Subcommand};
use face_react_adapters::models::{ProgressCallback, MODELS};
use face_react_adapters::ModelStore;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::AppConfig;

/// Arguments for the models command
#[derive(Args)]
pub struct ModelsArgs {
    /// Custom models directory (overrides default and config)
    #[arg(long, value_name = "DIR", global = true)]
    pub models_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Models subcommands
#[derive(Subcommand)]
pub enum ModelsCommand {
    /// Download required models
    Fetch,
    /// List installed models
    List,
    /// Print model directory path
    Path,
}

/// Run the models command.
pub fn run(args: &ModelsArgs, config: &AppConfig) -> Result<()> {
    let store = match args.models_dir.clone().or_else(|| config.models.dir.clone()) {
        Some(dir) => ModelStore::new(dir),
        None => ModelStore::default_location(),
    };

    match args.command {
        ModelsCommand::Fetch => fetch_models(&store),
        ModelsCommand::List => {
            list_models(&store);
            Ok(())
        }
        ModelsCommand::Path => {
            println!("{}", store.dir().display());
            Ok(())
        }
    }
}

/// Byte-level download bar that resets whenever a new model starts.
struct DownloadBar {
    bar: ProgressBar,
    current: Mutex<String>,
}

impl DownloadBar {
    fn new() -> Result<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg:>8} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .map_err(|e| anyhow::anyhow!("Invalid progress template: {e}"))?
                .progress_chars("#>-"),
        );
        Ok(Self {
            bar,
            current: Mutex::new(String::new()),
        })
    }

    fn update(&self, name: &str, downloaded: u64, total: Option<u64>) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != name {
            name.clone_into(&mut current);
            self.bar.reset();
            self.bar.set_length(total.unwrap_or(0));
            self.bar.set_message(name.to_string());
        }
        self.bar.set_position(downloaded);
    }
}

fn fetch_models(store: &ModelStore) -> Result<()> {
    let bar = Arc::new(DownloadBar::new()?);
    let sink = Arc::clone(&bar);
    let progress: ProgressCallback =
        Box::new(move |name: &str, downloaded: u64, total: Option<u64>| {
            sink.update(name, downloaded, total);
        });

    let manual = store.fetch(Some(&progress))?;
    bar.bar.finish_and_clear();

    if manual.is_empty() {
        println!("All models installed in {}", store.dir().display());
    } else {
        for name in manual {
            let filename = MODELS
                .iter()
                .find(|m| m.name == name)
                .map_or("unknown", |m| m.filename);
            println!(
                "  ! {name} must be placed by hand: {}",
                store.dir().join(filename).display()
            );
        }
    }
    Ok(())
}

fn list_models(store: &ModelStore) {
    let models = store.list();

    println!("Models directory: {}", store.dir().display());
    println!();

    for status in &models {
        let mark = if status.installed { "✓" } else { "✗" };
        let source = if status.downloadable { "" } else { ", manual" };
        let description = MODELS
            .iter()
            .find(|m| m.name == status.name)
            .map_or("", |m| m.description);
        println!(
            "  {mark} {} ({}{source}) - {description}",
            status.name, status.filename
        );
    }

    println!();
    let installed_count = models.iter().filter(|s| s.installed).count();
    println!("{}/{} models installed", installed_count, models.len());
}

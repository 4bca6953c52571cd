//! Face React CLI - camera-driven emotion mirror for a small TFT display.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;

use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // The run loop reports every display change at info
    let quiet_level = u8::from(matches!(cli.command, Commands::Run(_)));
    let filter = match quiet_level.saturating_add(cli.verbose) {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let result = match cli.command {
        Commands::Run(args) => {
            let config = AppConfig::load();
            commands::run::run(&args.with_config(&config))
        }
        Commands::Render(ref args) => commands::render::run(args),
        Commands::Models(ref args) => {
            let config = AppConfig::load();
            commands::models::run(args, &config)
        }
    };

    let exit_code = match result {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    };

    exit_code.into()
}

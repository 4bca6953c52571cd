//! CLI command definitions and handlers.

pub mod models;
pub mod render;
pub mod run;

use clap::{Parser, Subcommand};

/// Face React - mirror the viewer's expression as eyes on a small display
#[derive(Parser)]
#[command(name = "face-react")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the camera → emotion → display loop
    Run(run::RunArgs),
    /// Render one expression to a PNG file
    Render(render::RenderArgs),
    /// Manage ML models
    Models(models::ModelsArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Clean completion or interrupt.
    Success,
    /// Startup failure or command error.
    Error,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        match code {
            ExitCode::Success => Self::SUCCESS,
            ExitCode::Error => Self::from(1),
        }
    }
}

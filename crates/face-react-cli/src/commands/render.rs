//! Render command - draw one expression to a PNG.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use face_react_adapters::SnapshotDisplay;
use face_react_core::{EmotionLabel, ExpressionRenderer};
use tracing::info;

/// Parse a label name, listing the accepted names on failure.
fn parse_label(s: &str) -> Result<EmotionLabel, String> {
    s.parse().map_err(|_| {
        let names: Vec<String> = EmotionLabel::ALL
            .iter()
            .map(|l| l.name().to_lowercase())
            .collect();
        format!("unknown expression '{s}' (expected one of: {})", names.join(", "))
    })
}

/// Arguments for the render command.
#[derive(Args, Clone)]
pub struct RenderArgs {
    /// Expression to draw (angry, disgust, fear, happy, sad, surprise, neutral)
    #[arg(value_parser = parse_label)]
    pub label: EmotionLabel,

    /// PNG file to write
    #[arg(short, long, value_name = "PNG")]
    pub output: PathBuf,
}

/// Run the render command.
///
/// Writes the bitmap exactly as the display would receive it.
pub fn run(args: &RenderArgs) -> Result<()> {
    let mut renderer = ExpressionRenderer::new(SnapshotDisplay::new(&args.output));
    renderer.draw(args.label);
    renderer
        .present()
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!("{} written to {}", args.label, args.output.display());
    Ok(())
}

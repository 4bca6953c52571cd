//! Run command - the live reaction loop.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use face_react_adapters::models::{CLASSIFIER_MODEL, DETECTOR_MODEL};
use face_react_adapters::{
    default_models_dir, FramebufferDisplay, ModelStore, ReplaySource, SeetaFaceLocator,
    SnapshotDisplay,
};
use face_react_core::controller::{DEFAULT_INTERVAL, DEFAULT_THRESHOLD};
use face_react_core::inference::CnnEmotionClassifier;
use face_react_core::render::{CANVAS_HEIGHT, CANVAS_WIDTH};
use face_react_core::{
    DisplaySink, ExpressionRenderer, FrameSource, ReactionConfig, ReactionController, Shutdown,
};
use tracing::{debug, info};

use crate::config::AppConfig;

/// Hardcoded default values.
mod defaults {
    pub const DEVICE: &str = "/dev/fb1";
    #[cfg_attr(not(feature = "camera"), allow(dead_code))]
    pub const CAMERA_INDEX: u32 = 0;
    pub const WARMUP_MS: u64 = 2000;
    pub const SELF_TEST_STEP_MS: u64 = 500;
}

/// Parse and validate a threshold value (0.0-1.0).
fn parse_threshold(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0.0..=1.0"))
    }
}

/// Arguments for the run command.
#[derive(Args, Clone, Default)]
pub struct RunArgs {
    /// Replay image files or directories instead of opening a camera
    #[arg(long, value_name = "PATH", num_args = 1..)]
    pub replay: Vec<PathBuf>,

    /// Write each displayed bitmap to this PNG instead of a framebuffer
    #[arg(long, value_name = "PNG", conflicts_with = "device")]
    pub snapshot: Option<PathBuf>,

    /// Framebuffer device [default: /dev/fb1]
    #[arg(long, value_name = "FB")]
    pub device: Option<PathBuf>,

    /// Camera index [default: 0]
    #[arg(long, value_name = "N")]
    pub camera: Option<u32>,

    /// Confidence a new expression must exceed (0.0-1.0) [default: 0.4]
    #[arg(long, value_parser = parse_threshold)]
    pub threshold: Option<f32>,

    /// Pause between cycles in milliseconds [default: 800]
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: Option<u64>,

    /// Stop after this many cycles
    #[arg(long, value_name = "N")]
    pub max_cycles: Option<u64>,

    /// Skip the startup colour test
    #[arg(long)]
    pub skip_self_test: bool,

    /// Emotion classifier weights (overrides models directory)
    #[arg(long, value_name = "FILE")]
    pub classifier_model: Option<PathBuf>,

    /// Face detector model (overrides models directory)
    #[arg(long, value_name = "FILE")]
    pub detector_model: Option<PathBuf>,

    /// Custom models directory (overrides default and config)
    #[arg(long, value_name = "DIR")]
    pub models_dir: Option<PathBuf>,

    /// Camera warm-up from config (not a CLI flag).
    #[arg(skip)]
    warmup_ms: Option<u64>,

    /// Self-test step from config (not a CLI flag).
    #[arg(skip)]
    self_test_step_ms: Option<u64>,
}

impl RunArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    #[must_use]
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        if self.snapshot.is_none() && self.device.is_none() {
            self.device.clone_from(&config.display.device);
        }
        self.camera = self.camera.or(config.camera.index);
        self.threshold = self.threshold.or(config.reaction.threshold);
        self.interval_ms = self.interval_ms.or(config.reaction.interval_ms);

        // CLI --skip-self-test always wins
        if !self.skip_self_test {
            self.skip_self_test = config.display.self_test == Some(false);
        }

        if self.classifier_model.is_none() {
            self.classifier_model.clone_from(&config.models.classifier);
        }
        if self.detector_model.is_none() {
            self.detector_model.clone_from(&config.models.detector);
        }
        if self.models_dir.is_none() {
            self.models_dir.clone_from(&config.models.dir);
        }

        self.warmup_ms = config.camera.warmup_ms;
        self.self_test_step_ms = config.display.self_test_step_ms;
        self
    }

    fn reaction_config(&self) -> ReactionConfig {
        ReactionConfig {
            threshold: self.threshold.unwrap_or(DEFAULT_THRESHOLD),
            interval: self
                .interval_ms
                .map_or(DEFAULT_INTERVAL, Duration::from_millis),
            max_cycles: self.max_cycles,
        }
    }

    fn store(&self) -> ModelStore {
        ModelStore::new(self.models_dir.clone().unwrap_or_else(default_models_dir))
    }

    fn classifier_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.classifier_model {
            return Ok(path.clone());
        }
        self.store()
            .model_path(CLASSIFIER_MODEL)
            .context("Unknown classifier model")
    }

    fn detector_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.detector_model {
            return Ok(path.clone());
        }
        self.store()
            .model_path(DETECTOR_MODEL)
            .context("Unknown detector model")
    }

    fn device(&self) -> PathBuf {
        self.device
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::DEVICE))
    }

    #[cfg_attr(not(feature = "camera"), allow(dead_code))]
    fn warmup(&self) -> Duration {
        Duration::from_millis(self.warmup_ms.unwrap_or(defaults::WARMUP_MS))
    }

    fn self_test_step(&self) -> Duration {
        Duration::from_millis(
            self.self_test_step_ms
                .unwrap_or(defaults::SELF_TEST_STEP_MS),
        )
    }
}

/// Run the reaction loop.
///
/// Startup runs in a fixed order (display self-test, model, camera,
/// detector) and any failure there aborts with an error. Once the loop is
/// running it only stops on interrupt or the cycle limit.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &RunArgs) -> Result<()> {
    let display = open_display(args)?;
    let mut renderer = ExpressionRenderer::new(display);
    if args.skip_self_test {
        debug!("Display self-test skipped");
    } else {
        renderer
            .self_test(args.self_test_step())
            .context("Display self-test failed")?;
    }

    let classifier_path = args.classifier_path()?;
    let classifier = CnnEmotionClassifier::load(&classifier_path).with_context(|| {
        format!(
            "Cannot start without the emotion model; place it at {} or pass --classifier-model",
            classifier_path.display()
        )
    })?;

    let source = open_source(args)?;

    let detector_path = args.detector_path()?;
    let locator = SeetaFaceLocator::load(&detector_path).with_context(|| {
        format!(
            "Cannot start without the face detector; run `face-react models fetch` or pass --detector-model ({})",
            detector_path.display()
        )
    })?;

    let shutdown = Shutdown::new();
    let handle = shutdown.clone();
    ctrlc::set_handler(move || handle.request()).context("Failed to install signal handler")?;

    let mut controller =
        ReactionController::new(source, locator, classifier, renderer, args.reaction_config());
    let summary = controller.run(&shutdown);
    info!(
        "Stopped after {} cycle(s), {} expression change(s)",
        summary.cycles, summary.renders
    );
    Ok(())
}

fn open_display(args: &RunArgs) -> Result<Box<dyn DisplaySink>> {
    if let Some(path) = &args.snapshot {
        info!("Writing display snapshots to {}", path.display());
        return Ok(Box::new(SnapshotDisplay::new(path)));
    }
    // The panel is mounted landscape: the oriented bitmap is 320×240.
    let device = args.device();
    let fb = FramebufferDisplay::open(&device, CANVAS_HEIGHT, CANVAS_WIDTH)
        .context("Failed to open display")?;
    Ok(Box::new(fb))
}

fn open_source(args: &RunArgs) -> Result<Box<dyn FrameSource>> {
    if !args.replay.is_empty() {
        let source = ReplaySource::new(&args.replay).context("Failed to open replay source")?;
        return Ok(Box::new(source));
    }
    open_camera(args)
}

#[cfg(feature = "camera")]
fn open_camera(args: &RunArgs) -> Result<Box<dyn FrameSource>> {
    let index = args.camera.unwrap_or(defaults::CAMERA_INDEX);
    let camera = face_react_adapters::CameraSource::open(index, args.warmup())
        .context("Failed to initialize camera")?;
    Ok(Box::new(camera))
}

#[cfg(not(feature = "camera"))]
fn open_camera(_args: &RunArgs) -> Result<Box<dyn FrameSource>> {
    anyhow::bail!("Failed to initialize camera: built without camera support; use --replay")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(toml: &str) -> AppConfig {
        toml::from_str(toml).unwrap_or_else(|e| panic!("parse: {e}"))
    }

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold("0.5"), Ok(0.5));
        assert!(parse_threshold("1.5").is_err());
        assert!(parse_threshold("abc").is_err());
    }

    #[test]
    fn test_defaults_apply_without_config() {
        let args = RunArgs::default().with_config(&AppConfig::default());
        let reaction = args.reaction_config();
        assert!((reaction.threshold - 0.4).abs() < f32::EPSILON);
        assert_eq!(reaction.interval, Duration::from_millis(800));
        assert_eq!(args.device(), PathBuf::from("/dev/fb1"));
        assert_eq!(args.warmup(), Duration::from_millis(2000));
        assert_eq!(args.self_test_step(), Duration::from_millis(500));
        assert!(!args.skip_self_test);
    }

    #[test]
    fn test_config_fills_unset_args() {
        let args = RunArgs::default().with_config(&config(
            r#"
[display]
device = "/dev/fb0"
self_test = false

[reaction]
threshold = 0.6
interval_ms = 250

[models]
dir = "/models"
"#,
        ));
        assert_eq!(args.device(), PathBuf::from("/dev/fb0"));
        assert!(args.skip_self_test);
        assert!((args.reaction_config().threshold - 0.6).abs() < f32::EPSILON);
        assert_eq!(args.reaction_config().interval, Duration::from_millis(250));
        assert_eq!(
            args.classifier_path().ok(),
            Some(PathBuf::from("/models/emotion.safetensors"))
        );
    }

    #[test]
    fn test_cli_overrides_config() {
        let args = RunArgs {
            threshold: Some(0.9),
            classifier_model: Some(PathBuf::from("/tmp/mine.safetensors")),
            ..RunArgs::default()
        }
        .with_config(&config(
            r#"
[reaction]
threshold = 0.2

[models]
classifier = "/etc/emotion.safetensors"
"#,
        ));
        assert!((args.reaction_config().threshold - 0.9).abs() < f32::EPSILON);
        assert_eq!(
            args.classifier_path().ok(),
            Some(PathBuf::from("/tmp/mine.safetensors"))
        );
    }

    #[test]
    fn test_snapshot_ignores_configured_device() {
        let args = RunArgs {
            snapshot: Some(PathBuf::from("out.png")),
            ..RunArgs::default()
        }
        .with_config(&config("[display]\ndevice = \"/dev/fb0\"\n"));
        assert!(args.device.is_none());
    }
}

//! Configuration file support for face-react.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/face-react/config.toml` (lowest priority)
//! - Project-local: `.face-react.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Camera settings.
    pub camera: CameraConfig,
    /// Display settings.
    pub display: DisplayConfig,
    /// Reaction loop settings.
    pub reaction: ReactionConfig,
    /// Model settings.
    pub models: ModelsConfig,
}

/// Camera configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera index.
    pub index: Option<u32>,
    /// Frames are discarded for this long after opening.
    pub warmup_ms: Option<u64>,
}

/// Display configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Framebuffer device path.
    pub device: Option<PathBuf>,
    /// Run the colour self-test at startup.
    pub self_test: Option<bool>,
    /// How long each self-test colour is held.
    pub self_test_step_ms: Option<u64>,
}

/// Reaction loop configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ReactionConfig {
    /// Confidence a new label must exceed (0.0-1.0).
    pub threshold: Option<f32>,
    /// Pause between cycles.
    pub interval_ms: Option<u64>,
}

/// Model configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Custom models directory path.
    pub dir: Option<PathBuf>,
    /// Explicit emotion classifier file.
    pub classifier: Option<PathBuf>,
    /// Explicit face detector file.
    pub detector: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/face-react/config.toml`
    /// 2. Project-local: `.face-react.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are reported as
    /// warnings and dropped.
    pub fn load() -> Self {
        let mut config = Self::default();

        // Load XDG config (lowest priority)
        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        // Load project-local config (higher priority, merged)
        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        for problem in config.sanitize() {
            eprintln!("warning: {problem}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if let Some(t) = self.reaction.threshold {
            if !(0.0..=1.0).contains(&t) {
                problems.push(format!("reaction.threshold must be 0.0-1.0, got {t}"));
            }
        }
        if self.reaction.interval_ms == Some(0) {
            problems.push("reaction.interval_ms must be greater than 0".to_string());
        }
        if self.display.self_test_step_ms == Some(0) {
            problems.push("display.self_test_step_ms must be greater than 0".to_string());
        }

        problems
    }

    /// Drops invalid values so their defaults apply, returning what was
    /// dropped.
    fn sanitize(&mut self) -> Vec<String> {
        let problems = self.validate();
        if self.reaction.threshold.is_some_and(|t| !(0.0..=1.0).contains(&t)) {
            self.reaction.threshold = None;
        }
        if self.reaction.interval_ms == Some(0) {
            self.reaction.interval_ms = None;
        }
        if self.display.self_test_step_ms == Some(0) {
            self.display.self_test_step_ms = None;
        }
        problems
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // Camera
        self.camera.index = other.camera.index.or(self.camera.index);
        self.camera.warmup_ms = other.camera.warmup_ms.or(self.camera.warmup_ms);

        // Display
        self.display.device = other.display.device.or_else(|| self.display.device.take());
        self.display.self_test = other.display.self_test.or(self.display.self_test);
        self.display.self_test_step_ms = other
            .display
            .self_test_step_ms
            .or(self.display.self_test_step_ms);

        // Reaction
        self.reaction.threshold = other.reaction.threshold.or(self.reaction.threshold);
        self.reaction.interval_ms = other.reaction.interval_ms.or(self.reaction.interval_ms);

        // Models
        self.models.dir = other.models.dir.or_else(|| self.models.dir.take());
        self.models.classifier = other
            .models
            .classifier
            .or_else(|| self.models.classifier.take());
        self.models.detector = other
            .models
            .detector
            .or_else(|| self.models.detector.take());
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("face-react").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.face-react.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".face-react.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}

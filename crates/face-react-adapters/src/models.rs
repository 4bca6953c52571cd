//! Model downloading and caching adapter.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

/// Placeholder checksum indicating verification should be skipped.
const PLACEHOLDER_CHECKSUM: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Name of the emotion classifier entry in [`MODELS`].
pub const CLASSIFIER_MODEL: &str = "emotion";
/// Name of the face detector entry in [`MODELS`].
pub const DETECTOR_MODEL: &str = "seeta";

/// Model metadata.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Model name/identifier.
    pub name: &'static str,
    /// What the model is for, shown by `models list`.
    pub description: &'static str,
    /// Download URL. `None` for models that must be placed by hand.
    pub url: Option<&'static str>,
    /// Expected SHA256 hash. All zeros skips verification.
    pub sha256: &'static str,
    /// Filename in models directory.
    pub filename: &'static str,
}

/// Known models.
pub const MODELS: &[ModelInfo] = &[
    ModelInfo {
        name: CLASSIFIER_MODEL,
        description: "64x64 grayscale emotion classifier (safetensors)",
        url: None,
        sha256: PLACEHOLDER_CHECKSUM,
        filename: "emotion.safetensors",
    },
    ModelInfo {
        name: DETECTOR_MODEL,
        description: "SeetaFace frontal face detector",
        url: Some(
            "https://github.com/atomashpolskiy/rustface/raw/master/model/seeta_fd_frontal_v1.0.bin",
        ),
        sha256: PLACEHOLDER_CHECKSUM,
        filename: "seeta_fd_frontal_v1.0.bin",
    },
];

/// Download progress callback: model name, bytes so far, total if known.
pub type ProgressCallback = Box<dyn Fn(&str, u64, Option<u64>) + Send + Sync>;

/// Returns the default models directory.
///
/// Uses `XDG_DATA_HOME/face-react/models` or `~/.local/share/face-react/models`.
#[must_use]
pub fn default_models_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("face-react")
        .join("models")
}

/// Installation state of one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelStatus {
    /// Short model name, as listed in [`MODELS`].
    pub name: &'static str,
    /// File name inside the models directory.
    pub filename: &'static str,
    /// The file is present.
    pub installed: bool,
    /// `models fetch` can download it.
    pub downloadable: bool,
}

/// A directory holding model files.
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    /// A store rooted at `dir`. Nothing is created until a download.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The store rooted at [`default_models_dir`].
    #[must_use]
    pub fn default_location() -> Self {
        Self::new(default_models_dir())
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path to a known model file, installed or not.
    #[must_use]
    pub fn model_path(&self, name: &str) -> Option<PathBuf> {
        MODELS
            .iter()
            .find(|m| m.name == name)
            .map(|m| self.dir.join(m.filename))
    }

    /// Lists known models with their status.
    #[must_use]
    pub fn list(&self) -> Vec<ModelStatus> {
        MODELS
            .iter()
            .map(|m| ModelStatus {
                name: m.name,
                filename: m.filename,
                installed: self.dir.join(m.filename).exists(),
                downloadable: m.url.is_some(),
            })
            .collect()
    }

    /// Downloads every missing model that has a URL.
    ///
    /// Returns the names of models that are still missing because they
    /// cannot be downloaded.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The models directory cannot be created
    /// - A model download fails
    /// - A model's checksum doesn't match
    pub fn fetch(&self, progress: Option<&ProgressCallback>) -> Result<Vec<&'static str>> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create models directory {}", self.dir.display())
        })?;

        let mut manual = Vec::new();
        for model in MODELS {
            let path = self.dir.join(model.filename);
            if path.exists() {
                debug!("Model {} already exists", model.name);
                continue;
            }
            match model.url {
                Some(url) => download_model(model, url, &path, progress)?,
                None => {
                    warn!(
                        "Model {} has no download source; place {} in {}",
                        model.name,
                        model.filename,
                        self.dir.display()
                    );
                    manual.push(model.name);
                }
            }
        }

        Ok(manual)
    }
}

/// Downloads a model, streaming through the checksum.
fn download_model(
    model: &ModelInfo,
    url: &str,
    path: &Path,
    progress: Option<&ProgressCallback>,
) -> Result<()> {
    info!("Downloading model: {}", model.name);

    let mut response = reqwest::blocking::get(url)
        .with_context(|| format!("Failed to download {}", model.name))?;

    if !response.status().is_success() {
        bail!("Download failed with status: {}", response.status());
    }

    let total = response.content_length();
    let mut hasher = Sha256::new();
    let mut bytes = Vec::with_capacity(usize::try_from(total.unwrap_or(0)).unwrap_or(0));
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = response
            .read(&mut buf)
            .with_context(|| format!("Failed to read response for {}", model.name))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        bytes.extend_from_slice(&buf[..n]);
        if let Some(cb) = progress {
            cb(model.name, bytes.len() as u64, total);
        }
    }

    verify_checksum(model, &format!("{:x}", hasher.finalize()), path)?;

    // Write next to the target first so an interrupted run leaves no
    // truncated model behind.
    let partial = path.with_extension("part");
    fs::write(&partial, &bytes).with_context(|| format!("Failed to write {}", model.name))?;
    fs::rename(&partial, path).with_context(|| format!("Failed to install {}", model.name))?;

    info!("Downloaded {} ({} bytes)", model.name, bytes.len());
    Ok(())
}

fn verify_checksum(model: &ModelInfo, hash: &str, path: &Path) -> Result<()> {
    if model.sha256 == PLACEHOLDER_CHECKSUM {
        debug!(
            "Skipping checksum verification for {} (placeholder checksum)",
            model.name
        );
        return Ok(());
    }
    if hash != model.sha256 {
        bail!(
            "Checksum mismatch for {}: expected {}, got {}. \
             Try deleting {} and re-running to download a fresh copy.",
            model.name,
            model.sha256,
            hash,
            path.display()
        );
    }
    Ok(())
}

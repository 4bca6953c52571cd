//! Error taxonomy shared by every component boundary.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised at the boundaries of the reaction loop.
///
/// Startup variants (`DetectorInit`, `ModelLoad`, and `Render`/`Capture` when
/// raised while opening devices) are fatal. During the loop, `Capture`,
/// `Classify` and `Render` are logged and the cycle is abandoned.
#[derive(Debug, Error)]
pub enum Error {
    /// The frame source could not deliver a frame.
    #[error("camera capture failed: {0}")]
    Capture(String),

    /// The face detector definition could not be loaded.
    #[error("face detector could not be loaded from {}: {reason}", path.display())]
    DetectorInit {
        /// Path of the detector definition.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// The emotion model artifact is missing or incompatible.
    #[error("emotion model could not be loaded from {}: {reason}", path.display())]
    ModelLoad {
        /// Path of the model artifact.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// A display write failed.
    #[error("display write failed: {0}")]
    Render(String),

    /// Classifier input violated its shape contract, or inference failed.
    #[error("classification failed: {0}")]
    Classify(String),
}

impl Error {
    /// Builds a [`Error::ModelLoad`] from any displayable cause.
    pub fn model_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ModelLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Builds a [`Error::DetectorInit`] from any displayable cause.
    pub fn detector_init(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DetectorInit {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Emotion classifier port.

use crate::domain::{ClassificationResult, EmotionDistribution, FaceCrop};
use crate::error::Result;

/// Port for classifying a normalized face crop.
///
/// Output must be deterministic for a fixed model and input.
pub trait EmotionClassifier {
    /// Returns the probability of every label.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Classify`] if inference fails.
    fn distribution(&self, face: &FaceCrop) -> Result<EmotionDistribution>;

    /// Returns the single most probable label.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Classify`] if inference fails.
    fn classify(&self, face: &FaceCrop) -> Result<ClassificationResult> {
        self.distribution(face).map(|dist| dist.top())
    }
}

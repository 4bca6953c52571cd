//! Shared inference utilities.

use crate::domain::{EmotionDistribution, EmotionLabel};
use crate::error::{Error, Result};

/// Packs a softmax output vector into a distribution.
///
/// # Errors
///
/// Returns [`Error::Classify`] if the model produced the wrong number of
/// classes.
pub fn to_distribution(probabilities: &[f32]) -> Result<EmotionDistribution> {
    let probabilities: [f32; EmotionLabel::COUNT] = probabilities.try_into().map_err(|_| {
        Error::Classify(format!(
            "model produced {} classes, expected {}",
            probabilities.len(),
            EmotionLabel::COUNT
        ))
    })?;
    Ok(EmotionDistribution::new(probabilities))
}

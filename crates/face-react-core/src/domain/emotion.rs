//! Emotion labels and classifier outputs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of emotions the classifier distinguishes.
///
/// Declaration order is the classifier's output order; [`EmotionLabel::index`]
/// reads the matching probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionLabel {
    /// Anger.
    Angry,
    /// Disgust.
    Disgust,
    /// Fear.
    Fear,
    /// Happiness.
    Happy,
    /// Sadness.
    Sad,
    /// Surprise.
    Surprise,
    /// No particular expression.
    Neutral,
}

impl EmotionLabel {
    /// Number of labels.
    pub const COUNT: usize = 7;

    /// All labels in classifier output order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Angry,
        Self::Disgust,
        Self::Fear,
        Self::Happy,
        Self::Sad,
        Self::Surprise,
        Self::Neutral,
    ];

    /// Ordinal index into the classifier output.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Label for a classifier output index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Angry => "Angry",
            Self::Disgust => "Disgust",
            Self::Fear => "Fear",
            Self::Happy => "Happy",
            Self::Sad => "Sad",
            Self::Surprise => "Surprise",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown label name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel(pub String);

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown emotion '{}'", self.0)
    }
}

impl std::error::Error for UnknownLabel {}

impl FromStr for EmotionLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// The winning label for one face and its probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Highest-probability label.
    pub label: EmotionLabel,
    /// Probability of `label`, in `[0, 1]`.
    pub confidence: f32,
}

impl ClassificationResult {
    /// Creates a result, clamping confidence into `[0, 1]`.
    #[must_use]
    pub fn new(label: EmotionLabel, confidence: f32) -> Self {
        Self {
            label,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Full probability distribution over [`EmotionLabel::ALL`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionDistribution {
    probabilities: [f32; EmotionLabel::COUNT],
}

impl EmotionDistribution {
    /// Wraps raw classifier probabilities.
    #[must_use]
    pub const fn new(probabilities: [f32; EmotionLabel::COUNT]) -> Self {
        Self { probabilities }
    }

    /// Probability assigned to `label`.
    #[must_use]
    pub const fn probability(&self, label: EmotionLabel) -> f32 {
        self.probabilities[label.index()]
    }

    /// Raw probabilities in label order.
    #[must_use]
    pub const fn as_slice(&self) -> &[f32; EmotionLabel::COUNT] {
        &self.probabilities
    }

    /// The most probable label. Ties go to the lowest ordinal.
    #[must_use]
    pub fn top(&self) -> ClassificationResult {
        let mut best = EmotionLabel::Angry;
        for label in EmotionLabel::ALL {
            if self.probability(label) > self.probability(best) {
                best = label;
            }
        }
        ClassificationResult::new(best, self.probability(best))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for label in EmotionLabel::ALL {
            assert_eq!(EmotionLabel::from_index(label.index()), Some(label));
        }
        assert_eq!(EmotionLabel::from_index(7), None);
    }

    #[test]
    fn test_output_order() {
        assert_eq!(EmotionLabel::Angry.index(), 0);
        assert_eq!(EmotionLabel::Happy.index(), 3);
        assert_eq!(EmotionLabel::Neutral.index(), 6);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("happy".parse::<EmotionLabel>(), Ok(EmotionLabel::Happy));
        assert_eq!("SURPRISE".parse::<EmotionLabel>(), Ok(EmotionLabel::Surprise));
        assert!("bored".parse::<EmotionLabel>().is_err());
    }

    #[test]
    fn test_top_picks_highest() {
        let dist = EmotionDistribution::new([0.05, 0.05, 0.1, 0.6, 0.1, 0.05, 0.05]);
        let top = dist.top();
        assert_eq!(top.label, EmotionLabel::Happy);
        assert!((top.confidence - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_top_tie_goes_to_lowest_ordinal() {
        let dist = EmotionDistribution::new([1.0 / 7.0; 7]);
        assert_eq!(dist.top().label, EmotionLabel::Angry);
    }

    #[test]
    fn test_confidence_clamped() {
        assert!((ClassificationResult::new(EmotionLabel::Sad, 1.2).confidence - 1.0).abs() < 1e-6);
        assert!(ClassificationResult::new(EmotionLabel::Sad, -0.1).confidence.abs() < 1e-6);
    }
}

//! Debounce policy deciding when the display changes.

use crate::domain::{ClassificationResult, EmotionLabel};

/// Default confidence a new label must strictly exceed.
pub const DEFAULT_THRESHOLD: f32 = 0.4;

/// What one cycle saw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observation {
    /// The first face in scan order was classified.
    Face(ClassificationResult),
    /// The locator found no face.
    NoFace,
}

/// Returns the label to render, or `None` to leave the display untouched.
///
/// A classified face changes the display only if its label differs from what
/// is shown and its confidence is strictly above `threshold`. An empty frame
/// returns the display to Neutral unless it already is.
#[must_use]
pub fn next_display(
    current: Option<EmotionLabel>,
    observation: &Observation,
    threshold: f32,
) -> Option<EmotionLabel> {
    match *observation {
        Observation::Face(result) => {
            let changed = Some(result.label) != current;
            (changed && result.confidence > threshold).then_some(result.label)
        }
        Observation::NoFace => {
            (current != Some(EmotionLabel::Neutral)).then_some(EmotionLabel::Neutral)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(label: EmotionLabel, confidence: f32) -> Observation {
        Observation::Face(ClassificationResult::new(label, confidence))
    }

    fn decide(current: EmotionLabel, observation: &Observation) -> Option<EmotionLabel> {
        next_display(Some(current), observation, DEFAULT_THRESHOLD)
    }

    #[test]
    fn test_confident_new_label_changes_display() {
        let next = decide(EmotionLabel::Neutral, &face(EmotionLabel::Happy, 0.9));
        assert_eq!(next, Some(EmotionLabel::Happy));
    }

    #[test]
    fn test_same_label_is_not_redrawn() {
        let next = decide(EmotionLabel::Happy, &face(EmotionLabel::Happy, 0.95));
        assert_eq!(next, None);
    }

    #[test]
    fn test_threshold_is_strict() {
        let next = decide(EmotionLabel::Happy, &face(EmotionLabel::Sad, 0.4));
        assert_eq!(next, None);

        let next = decide(EmotionLabel::Happy, &face(EmotionLabel::Sad, 0.400_01));
        assert_eq!(next, Some(EmotionLabel::Sad));
    }

    #[test]
    fn test_low_confidence_never_changes_display() {
        for current in [None, Some(EmotionLabel::Happy), Some(EmotionLabel::Neutral)] {
            for label in EmotionLabel::ALL {
                for confidence in [0.0, 0.1, 0.3, 0.399, 0.4] {
                    let next = next_display(current, &face(label, confidence), DEFAULT_THRESHOLD);
                    assert_eq!(next, None, "{label} at {confidence} from {current:?}");
                }
            }
        }
    }

    #[test]
    fn test_first_confident_face_renders_from_blank() {
        let next = next_display(None, &face(EmotionLabel::Angry, 0.5), DEFAULT_THRESHOLD);
        assert_eq!(next, Some(EmotionLabel::Angry));
    }

    #[test]
    fn test_no_face_returns_to_neutral() {
        assert_eq!(
            next_display(Some(EmotionLabel::Sad), &Observation::NoFace, DEFAULT_THRESHOLD),
            Some(EmotionLabel::Neutral)
        );
        assert_eq!(
            next_display(None, &Observation::NoFace, DEFAULT_THRESHOLD),
            Some(EmotionLabel::Neutral)
        );
    }

    #[test]
    fn test_no_face_while_neutral_is_noop() {
        assert_eq!(
            next_display(Some(EmotionLabel::Neutral), &Observation::NoFace, DEFAULT_THRESHOLD),
            None
        );
    }
}

//! Hand-authored eye patterns, in portrait canvas coordinates.

use crate::domain::EmotionLabel;

/// A drawing primitive in a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A straight stroke.
    Line {
        /// Start point.
        from: (i32, i32),
        /// End point.
        to: (i32, i32),
        /// Stroke width in pixels.
        width: u32,
    },
    /// A filled rectangle with rounded corners.
    RoundedRect {
        /// Left edge.
        x: i32,
        /// Top edge.
        y: i32,
        /// Width.
        width: i32,
        /// Height.
        height: i32,
        /// Corner radius.
        radius: i32,
    },
}

const fn line(from: (i32, i32), to: (i32, i32), width: u32) -> Shape {
    Shape::Line { from, to, width }
}

const fn eye(x: i32, y: i32) -> Shape {
    Shape::RoundedRect {
        x,
        y,
        width: 60,
        height: 70,
        radius: 9,
    }
}

/// Upturned arcs.
const HAPPY: [Shape; 4] = [
    line((35, 130), (70, 95), 10),
    line((65, 95), (95, 130), 10),
    line((145, 130), (180, 95), 10),
    line((175, 95), (205, 130), 10),
];

/// Downturned arcs.
const SAD: [Shape; 4] = [
    line((35, 110), (70, 135), 10),
    line((65, 135), (95, 110), 10),
    line((145, 110), (180, 135), 10),
    line((175, 135), (205, 110), 10),
];

/// Slanted brows over slanted lids.
const ANGRY: [Shape; 4] = [
    line((35, 100), (100, 120), 6),
    line((35, 120), (100, 140), 11),
    line((145, 120), (210, 100), 6),
    line((145, 140), (210, 120), 11),
];

/// Two open eyes.
const NEUTRAL: [Shape; 2] = [eye(40, 100), eye(160, 100)];

/// Returns the shapes drawn for `label`.
///
/// Disgust, Fear and Surprise have no pattern of their own and use Neutral.
#[must_use]
pub const fn pattern(label: EmotionLabel) -> &'static [Shape] {
    match label {
        EmotionLabel::Happy => &HAPPY,
        EmotionLabel::Sad => &SAD,
        EmotionLabel::Angry => &ANGRY,
        EmotionLabel::Neutral
        | EmotionLabel::Disgust
        | EmotionLabel::Fear
        | EmotionLabel::Surprise => &NEUTRAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmapped_labels_fall_back_to_neutral() {
        for label in [EmotionLabel::Disgust, EmotionLabel::Fear, EmotionLabel::Surprise] {
            assert_eq!(pattern(label), pattern(EmotionLabel::Neutral));
        }
    }

    #[test]
    fn test_mapped_patterns_are_distinct() {
        let mapped = [
            EmotionLabel::Happy,
            EmotionLabel::Sad,
            EmotionLabel::Angry,
            EmotionLabel::Neutral,
        ];
        for (i, a) in mapped.iter().enumerate() {
            for b in &mapped[i + 1..] {
                assert_ne!(pattern(*a), pattern(*b), "{a} and {b} share a pattern");
            }
        }
    }

    #[test]
    fn test_patterns_fit_canvas() {
        use super::super::canvas::{CANVAS_HEIGHT, CANVAS_WIDTH};
        let (w, h) = (CANVAS_WIDTH as i32, CANVAS_HEIGHT as i32);

        for label in EmotionLabel::ALL {
            for shape in pattern(label) {
                let corners = match *shape {
                    Shape::Line { from, to, .. } => [from, to],
                    Shape::RoundedRect { x, y, width, height, .. } => {
                        [(x, y), (x + width, y + height)]
                    }
                };
                for (x, y) in corners {
                    assert!((0..w).contains(&x) && (0..h).contains(&y), "{label}: ({x}, {y})");
                }
            }
        }
    }
}

//! Expression renderer: draws eye patterns and pushes them to the display.

use std::thread;
use std::time::Duration;

use image::{Rgb, RgbImage};
use tracing::{debug, info, warn};

use super::canvas::{Canvas, CANVAS_HEIGHT, CANVAS_WIDTH};
use super::patterns::pattern;
use crate::domain::EmotionLabel;
use crate::error::Result;
use crate::ports::DisplaySink;

/// Solid colours flashed by [`ExpressionRenderer::self_test`].
pub const SELF_TEST_COLORS: [Rgb<u8>; 4] = [
    Rgb([255, 0, 0]),
    Rgb([0, 255, 0]),
    Rgb([0, 0, 255]),
    Rgb([255, 255, 255]),
];

/// Owns the canvas and the display it is flushed to.
pub struct ExpressionRenderer<D> {
    canvas: Canvas,
    display: D,
}

impl<D: DisplaySink> ExpressionRenderer<D> {
    /// Creates a renderer with a blank canvas.
    pub fn new(display: D) -> Self {
        Self {
            canvas: Canvas::new(),
            display,
        }
    }

    /// Draws `label` and flushes it to the display.
    ///
    /// A failed display write is logged and dropped; the next render tries
    /// again.
    pub fn render(&mut self, label: EmotionLabel) {
        info!("Drawing {label} face");
        self.draw(label);
        match self.present() {
            Ok(()) => debug!("{label} face displayed"),
            Err(e) => warn!("Could not show {label} face: {e}"),
        }
    }

    /// Draws `label` onto the canvas without flushing.
    pub fn draw(&mut self, label: EmotionLabel) {
        self.canvas.clear();
        for shape in pattern(label) {
            self.canvas.draw(shape);
        }
    }

    /// Resets the canvas to the background colour without flushing.
    pub fn clear(&mut self) {
        self.canvas.clear();
    }

    /// Flushes the canvas, rotated into the display orientation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Render`] if the display write fails.
    pub fn present(&mut self) -> Result<()> {
        let bitmap = self.canvas.oriented();
        self.display.show(&bitmap)
    }

    /// Startup check: flashes red, green, blue and white, holding each for
    /// `step`, then shows the Neutral face.
    ///
    /// # Errors
    ///
    /// Returns the first display failure; the caller treats it as fatal.
    pub fn self_test(&mut self, step: Duration) -> Result<()> {
        info!("Testing display with startup pattern");
        for color in SELF_TEST_COLORS {
            let solid = RgbImage::from_pixel(CANVAS_HEIGHT, CANVAS_WIDTH, color);
            self.display.show(&solid)?;
            thread::sleep(step);
        }

        self.draw(EmotionLabel::Neutral);
        self.present()?;
        info!("Display test complete, showing neutral face");
        Ok(())
    }

    /// The canvas as last drawn.
    pub const fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// The display sink.
    pub const fn display(&self) -> &D {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::render::canvas::{BACKGROUND, EYE_COLOR};

    /// Records every bitmap; fails every write when `failing` is set.
    #[derive(Default)]
    struct RecordingSink {
        shown: Vec<RgbImage>,
        failing: bool,
    }

    impl DisplaySink for RecordingSink {
        fn show(&mut self, bitmap: &RgbImage) -> Result<()> {
            if self.failing {
                return Err(Error::Render("spi write timed out".into()));
            }
            self.shown.push(bitmap.clone());
            Ok(())
        }
    }

    fn renderer() -> ExpressionRenderer<RecordingSink> {
        ExpressionRenderer::new(RecordingSink::default())
    }

    #[test]
    fn test_render_is_idempotent_for_every_label() {
        for label in EmotionLabel::ALL {
            let mut r = renderer();
            r.render(label);
            let first = r.canvas().clone();
            r.render(label);
            assert_eq!(r.canvas(), &first, "{label} drew differently twice");
            assert_eq!(r.display().shown.len(), 2);
            assert_eq!(r.display().shown[0], r.display().shown[1]);
        }
    }

    #[test]
    fn test_render_after_other_label_matches_fresh_render() {
        let mut fresh = renderer();
        fresh.render(EmotionLabel::Sad);

        let mut reused = renderer();
        reused.render(EmotionLabel::Happy);
        reused.render(EmotionLabel::Sad);

        assert_eq!(fresh.canvas(), reused.canvas());
    }

    #[test]
    fn test_unmapped_label_renders_neutral() {
        let mut neutral = renderer();
        neutral.render(EmotionLabel::Neutral);
        let mut fear = renderer();
        fear.render(EmotionLabel::Fear);
        assert_eq!(neutral.canvas(), fear.canvas());
    }

    #[test]
    fn test_neutral_pixels() {
        let mut r = renderer();
        r.render(EmotionLabel::Neutral);
        let canvas = r.canvas().image();
        assert_eq!(*canvas.get_pixel(70, 135), EYE_COLOR);
        assert_eq!(*canvas.get_pixel(190, 135), EYE_COLOR);
        assert_eq!(*canvas.get_pixel(130, 135), BACKGROUND);

        // Pushed bitmap is the landscape rotation
        let shown = &r.display().shown[0];
        assert_eq!(shown.dimensions(), (320, 240));
        assert_eq!(*shown.get_pixel(135, 239 - 70), EYE_COLOR);
    }

    #[test]
    fn test_render_failure_is_not_propagated() {
        let mut r = ExpressionRenderer::new(RecordingSink {
            failing: true,
            ..RecordingSink::default()
        });
        r.render(EmotionLabel::Happy);
        // Canvas still holds the pattern even though the flush failed
        assert_ne!(r.canvas(), &Canvas::new());
    }

    #[test]
    fn test_clear_does_not_flush() {
        let mut r = renderer();
        r.render(EmotionLabel::Angry);
        r.clear();
        assert_eq!(r.canvas(), &Canvas::new());
        assert_eq!(r.display().shown.len(), 1);
    }

    #[test]
    fn test_present_after_clear_shows_blank() {
        let mut r = renderer();
        r.render(EmotionLabel::Happy);
        r.clear();
        assert!(r.present().is_ok());
        let last = r.display().shown.last().cloned().unwrap_or_default();
        assert!(last.pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn test_self_test_sequence() {
        let mut r = renderer();
        assert!(r.self_test(Duration::ZERO).is_ok());

        let shown = &r.display().shown;
        assert_eq!(shown.len(), SELF_TEST_COLORS.len() + 1);
        for (bitmap, color) in shown.iter().zip(SELF_TEST_COLORS) {
            assert_eq!(bitmap.dimensions(), (320, 240));
            assert!(bitmap.pixels().all(|p| *p == color));
        }

        let mut neutral = renderer();
        neutral.draw(EmotionLabel::Neutral);
        assert_eq!(r.canvas(), neutral.canvas());
    }

    #[test]
    fn test_self_test_failure_is_reported() {
        let mut r = ExpressionRenderer::new(RecordingSink {
            failing: true,
            ..RecordingSink::default()
        });
        assert!(matches!(r.self_test(Duration::ZERO), Err(Error::Render(_))));
    }
}

//! Captured frames, face regions and normalized face crops.

// Allow common image code patterns
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};

use crate::error::{Error, Result};

/// Capture width in pixels.
pub const FRAME_WIDTH: u32 = 320;
/// Capture height in pixels.
pub const FRAME_HEIGHT: u32 = 240;

/// Side length of the classifier input.
pub const CROP_SIZE: usize = 64;

/// A single captured color frame.
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Wraps a capture, resizing it to 320×240 if the device delivered
    /// something else.
    #[must_use]
    pub fn new(image: RgbImage) -> Self {
        let image = if image.dimensions() == (FRAME_WIDTH, FRAME_HEIGHT) {
            image
        } else {
            imageops::resize(&image, FRAME_WIDTH, FRAME_HEIGHT, FilterType::Triangle)
        };
        Self { image }
    }

    /// Frame width.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Frame height.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The color pixels.
    #[must_use]
    pub const fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Luma conversion used as detector and classifier input.
    #[must_use]
    pub fn to_gray(&self) -> GrayImage {
        imageops::grayscale(&self.image)
    }
}

/// An axis-aligned face rectangle in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRegion {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl FaceRegion {
    /// Creates a region.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clamps a detector rectangle (which may start off-frame) to the frame.
    ///
    /// Returns `None` when nothing of the rectangle lies inside the frame.
    #[must_use]
    pub fn clamped(
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        frame_w: u32,
        frame_h: u32,
    ) -> Option<Self> {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width).min(i64::from(frame_w));
        let y1 = (y + height).min(i64::from(frame_h));

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(Self::new(x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
    }
}

/// A 64×64 single-channel face crop scaled to `[0, 1]`.
///
/// This is the only input the emotion classifier accepts; its size is fixed
/// by the model artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceCrop {
    pixels: Vec<f32>,
}

impl FaceCrop {
    /// Number of values in a crop.
    pub const LEN: usize = CROP_SIZE * CROP_SIZE;

    /// Crops `region` out of the frame's luma channel, resizes it to 64×64
    /// and scales to `[0, 1]`.
    #[must_use]
    pub fn from_frame(frame: &Frame, region: &FaceRegion) -> Self {
        let gray = frame.to_gray();
        Self::from_gray(&gray, region)
    }

    /// Same as [`FaceCrop::from_frame`] on an already converted luma image.
    #[must_use]
    pub fn from_gray(gray: &GrayImage, region: &FaceRegion) -> Self {
        // Clamp so a stale region can never index past the image.
        let x = region.x.min(gray.width().saturating_sub(1));
        let y = region.y.min(gray.height().saturating_sub(1));
        let w = region.width.min(gray.width() - x).max(1);
        let h = region.height.min(gray.height() - y).max(1);

        let face = imageops::crop_imm(gray, x, y, w, h).to_image();
        let resized = imageops::resize(
            &face,
            CROP_SIZE as u32,
            CROP_SIZE as u32,
            FilterType::Triangle,
        );

        let pixels = resized.pixels().map(|p| f32::from(p[0]) / 255.0).collect();
        Self { pixels }
    }

    /// Wraps raw normalized pixels in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Classify`] if `pixels` is not exactly 64×64 values or
    /// any value falls outside `[0, 1]`.
    pub fn from_pixels(pixels: Vec<f32>) -> Result<Self> {
        if pixels.len() != Self::LEN {
            return Err(Error::Classify(format!(
                "face crop must have {} values, got {}",
                Self::LEN,
                pixels.len()
            )));
        }
        if let Some(bad) = pixels.iter().find(|v| !(0.0..=1.0).contains(*v)) {
            return Err(Error::Classify(format!(
                "face crop values must be in [0, 1], found {bad}"
            )));
        }
        Ok(Self { pixels })
    }

    /// An all-black crop.
    #[must_use]
    pub fn zeros() -> Self {
        Self {
            pixels: vec![0.0; Self::LEN],
        }
    }

    /// Normalized pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    #[test]
    fn test_frame_resized_to_capture_size() {
        let frame = Frame::new(RgbImage::new(640, 480));
        assert_eq!((frame.width(), frame.height()), (FRAME_WIDTH, FRAME_HEIGHT));
    }

    #[test]
    fn test_frame_gray_conversion() {
        let frame = Frame::new(RgbImage::from_pixel(320, 240, Rgb([255, 255, 255])));
        let gray = frame.to_gray();
        assert_eq!(gray.get_pixel(10, 10)[0], 255);
    }

    #[test]
    fn test_region_clamped_to_frame() {
        let region = FaceRegion::clamped(-10, -5, 50, 40, 320, 240);
        assert_eq!(region, Some(FaceRegion::new(0, 0, 40, 35)));

        let region = FaceRegion::clamped(300, 200, 50, 100, 320, 240);
        assert_eq!(region, Some(FaceRegion::new(300, 200, 20, 40)));
    }

    #[test]
    fn test_region_outside_frame_dropped() {
        assert_eq!(FaceRegion::clamped(400, 10, 20, 20, 320, 240), None);
        assert_eq!(FaceRegion::clamped(-30, 10, 20, 20, 320, 240), None);
    }

    #[test]
    fn test_crop_is_normalized() {
        let gray = GrayImage::from_pixel(320, 240, Luma([255]));
        let crop = FaceCrop::from_gray(&gray, &FaceRegion::new(100, 50, 80, 90));
        assert_eq!(crop.pixels().len(), FaceCrop::LEN);
        assert!(crop.pixels().iter().all(|v| (v - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_crop_reads_region_only() {
        // Left half black, right half white
        let gray =
            GrayImage::from_fn(320, 240, |x, _| if x < 160 { Luma([0]) } else { Luma([255]) });
        let crop = FaceCrop::from_gray(&gray, &FaceRegion::new(200, 20, 64, 64));
        assert!(crop.pixels().iter().all(|v| (v - 1.0).abs() < 1e-6));
        let crop = FaceCrop::from_gray(&gray, &FaceRegion::new(10, 20, 64, 64));
        assert!(crop.pixels().iter().all(|v| v.abs() < 1e-6));
    }

    #[test]
    fn test_crop_out_of_bounds_region_is_clamped() {
        let gray = GrayImage::new(320, 240);
        let crop = FaceCrop::from_gray(&gray, &FaceRegion::new(319, 239, 100, 100));
        assert_eq!(crop.pixels().len(), FaceCrop::LEN);
    }

    #[test]
    fn test_from_pixels_rejects_wrong_shape() {
        let err = FaceCrop::from_pixels(vec![0.0; 48 * 48]);
        assert!(matches!(err, Err(Error::Classify(_))));
    }

    #[test]
    fn test_from_pixels_rejects_unscaled_values() {
        let mut pixels = vec![0.5; FaceCrop::LEN];
        pixels[7] = 200.0;
        assert!(matches!(FaceCrop::from_pixels(pixels), Err(Error::Classify(_))));
    }

    #[test]
    fn test_zeros() {
        let crop = FaceCrop::zeros();
        assert_eq!(crop.pixels().len(), 4096);
        assert!(crop.pixels().iter().all(|v| *v == 0.0));
    }
}

//! Synthetic frame builders for testing.

use face_react_core::domain::{FaceRegion, Frame, FRAME_HEIGHT, FRAME_WIDTH};
use image::{Rgb, RgbImage};

/// Builder for creating synthetic camera frames.
///
/// Every frame comes out at the working resolution (320×240).
pub struct SyntheticFrameBuilder;

impl SyntheticFrameBuilder {
    // === Uniform Frames ===

    /// A black frame, like a covered lens.
    #[must_use]
    pub fn blank() -> Frame {
        Self::uniform(0, 0, 0)
    }

    /// A frame filled with one colour.
    #[must_use]
    pub fn uniform(r: u8, g: u8, b: u8) -> Frame {
        Frame::new(RgbImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, Rgb([r, g, b])))
    }

    /// A frame filled with one gray level.
    #[must_use]
    pub fn gray(value: u8) -> Frame {
        Self::uniform(value, value, value)
    }

    // === Structured Frames ===

    /// A left-to-right gray ramp from 0 to 255.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn horizontal_gradient() -> Frame {
        let img = RgbImage::from_fn(FRAME_WIDTH, FRAME_HEIGHT, |x, _| {
            let val = ((u32::from(u8::MAX) * x) / (FRAME_WIDTH - 1)) as u8;
            Rgb([val, val, val])
        });
        Frame::new(img)
    }

    /// A mid-gray frame with a white block where a face would be.
    ///
    /// Lets tests check that the crop comes from `region` and nowhere else.
    #[must_use]
    pub fn with_bright_region(region: FaceRegion) -> Frame {
        let img = RgbImage::from_fn(FRAME_WIDTH, FRAME_HEIGHT, |x, y| {
            let inside = x >= region.x
                && x < region.x + region.width
                && y >= region.y
                && y < region.y + region.height;
            if inside {
                Rgb([255, 255, 255])
            } else {
                Rgb([128, 128, 128])
            }
        });
        Frame::new(img)
    }

    /// A frame at an arbitrary camera resolution, resized on construction.
    #[must_use]
    pub fn sized(width: u32, height: u32, value: u8) -> Frame {
        Frame::new(RgbImage::from_pixel(width, height, Rgb([value, value, value])))
    }
}

/// Convenience functions for common regions.
impl SyntheticFrameBuilder {
    /// A 64×64 region in the middle of the frame.
    #[must_use]
    pub const fn centered_face() -> FaceRegion {
        FaceRegion::new(128, 88, 64, 64)
    }

    /// A smaller region in the top-left corner.
    #[must_use]
    pub const fn corner_face() -> FaceRegion {
        FaceRegion::new(0, 0, 40, 40)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use face_react_core::domain::FaceCrop;

    #[test]
    fn test_frames_have_working_resolution() {
        for frame in [
            SyntheticFrameBuilder::blank(),
            SyntheticFrameBuilder::gray(90),
            SyntheticFrameBuilder::horizontal_gradient(),
            SyntheticFrameBuilder::sized(640, 480, 10),
        ] {
            assert_eq!((frame.width(), frame.height()), (FRAME_WIDTH, FRAME_HEIGHT));
        }
    }

    #[test]
    fn test_gradient_range() {
        let frame = SyntheticFrameBuilder::horizontal_gradient();
        let gray = frame.to_gray();
        assert!(gray.get_pixel(0, 0).0[0] < 5);
        assert!(gray.get_pixel(FRAME_WIDTH - 1, 0).0[0] > 250);
    }

    #[test]
    fn test_bright_region_crop_is_white() {
        let region = SyntheticFrameBuilder::centered_face();
        let frame = SyntheticFrameBuilder::with_bright_region(region);
        let crop = FaceCrop::from_frame(&frame, &region);
        assert!(crop.pixels().iter().all(|p| (*p - 1.0).abs() < 1e-6));

        let elsewhere = FaceCrop::from_frame(&frame, &SyntheticFrameBuilder::corner_face());
        assert!(elsewhere.pixels().iter().all(|p| *p < 0.6));
    }
}

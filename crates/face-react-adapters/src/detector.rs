//! Face locator backed by the SeetaFace cascade in `rustface`.

use std::path::Path;

use face_react_core::domain::{FaceRegion, Frame};
use face_react_core::error::{Error, Result};
use face_react_core::ports::FaceLocator;
use rustface::{Detector, ImageData};
use tracing::{debug, info};

/// Smallest face, in pixels, the detector looks for.
pub const MIN_FACE_SIZE: u32 = 40;
const SCORE_THRESHOLD: f64 = 2.0;
const PYRAMID_SCALE_FACTOR: f32 = 0.8;
const WINDOW_STEP: u32 = 4;

/// Finds frontal faces on the grayscale frame.
///
/// Regions are returned in the detector's output order, clamped to the
/// frame.
pub struct SeetaFaceLocator {
    detector: Box<dyn Detector>,
}

impl SeetaFaceLocator {
    /// Loads the detector model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DetectorInit`] if the model file is missing or
    /// unreadable.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::detector_init(path, "model file not found"));
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| Error::detector_init(path, "path is not valid UTF-8"))?;

        let mut detector =
            rustface::create_detector(path_str).map_err(|e| Error::detector_init(path, e))?;
        detector.set_min_face_size(MIN_FACE_SIZE);
        detector.set_score_thresh(SCORE_THRESHOLD);
        detector.set_pyramid_scale_factor(PYRAMID_SCALE_FACTOR);
        detector.set_slide_window_step(WINDOW_STEP, WINDOW_STEP);

        info!("Face detector loaded from {}", path.display());
        Ok(Self { detector })
    }
}

impl FaceLocator for SeetaFaceLocator {
    fn locate(&mut self, frame: &Frame) -> Vec<FaceRegion> {
        let gray = frame.to_gray();
        let image = ImageData::new(gray.as_raw(), gray.width(), gray.height());

        let faces = self.detector.detect(&image);
        debug!("Detector returned {} candidate(s)", faces.len());

        faces
            .iter()
            .filter_map(|face| {
                let bbox = face.bbox();
                FaceRegion::clamped(
                    i64::from(bbox.x()),
                    i64::from(bbox.y()),
                    i64::from(bbox.width()),
                    i64::from(bbox.height()),
                    frame.width(),
                    frame.height(),
                )
            })
            .collect()
    }
}

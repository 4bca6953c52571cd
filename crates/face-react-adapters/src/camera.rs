//! Live camera frame source via `nokhwa`.

use std::time::{Duration, Instant};

use face_react_core::domain::{Frame, FRAME_HEIGHT, FRAME_WIDTH};
use face_react_core::error::{Error, Result};
use face_react_core::ports::FrameSource;
use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;
use tracing::{debug, info, warn};

const TARGET_FPS: u32 = 30;

/// A V4L2/AVFoundation/MSMF camera opened at 320×240 RGB.
pub struct CameraSource {
    camera: Camera,
    streaming: bool,
}

impl CameraSource {
    /// Opens camera `index` and starts streaming.
    ///
    /// Frames captured during `warmup` are discarded so auto-exposure can
    /// settle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Capture`] if the camera cannot be opened or will not
    /// stream.
    pub fn open(index: u32, warmup: Duration) -> Result<Self> {
        let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(
                Resolution::new(FRAME_WIDTH, FRAME_HEIGHT),
                FrameFormat::MJPEG,
                TARGET_FPS,
            ),
        ));

        let mut camera = Camera::new(CameraIndex::Index(index), format)
            .map_err(|e| Error::Capture(format!("cannot open camera {index}: {e}")))?;
        camera
            .open_stream()
            .map_err(|e| Error::Capture(format!("cannot start camera {index}: {e}")))?;

        info!(
            "Camera {index} streaming at {} ({})",
            camera.resolution(),
            camera.frame_format()
        );

        let mut source = Self {
            camera,
            streaming: true,
        };
        source.warm_up(warmup);
        Ok(source)
    }

    fn warm_up(&mut self, warmup: Duration) {
        let deadline = Instant::now() + warmup;
        let mut discarded = 0u32;
        while Instant::now() < deadline {
            if let Err(e) = self.camera.frame() {
                warn!("Warm-up capture failed, ending warm-up early: {e}");
                break;
            }
            discarded += 1;
        }
        debug!("Discarded {discarded} warm-up frame(s)");
    }
}

impl FrameSource for CameraSource {
    fn next_frame(&mut self) -> Result<Frame> {
        if !self.streaming {
            return Err(Error::Capture("camera was released".into()));
        }
        let buffer = self
            .camera
            .frame()
            .map_err(|e| Error::Capture(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::Capture(e.to_string()))?;

        let (width, height) = (decoded.width(), decoded.height());
        let image = RgbImage::from_raw(width, height, decoded.into_raw())
            .ok_or_else(|| Error::Capture(format!("short {width}x{height} frame")))?;
        Ok(Frame::new(image))
    }

    fn release(&mut self) {
        if !self.streaming {
            return;
        }
        self.streaming = false;
        match self.camera.stop_stream() {
            Ok(()) => info!("Camera released"),
            Err(e) => warn!("Could not stop camera stream: {e}"),
        }
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        self.release();
    }
}

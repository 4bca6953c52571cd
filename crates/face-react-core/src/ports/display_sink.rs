//! Display sink port.

use image::RgbImage;

use crate::error::Result;

/// Port for the physical display: a write-only sink for whole bitmaps.
pub trait DisplaySink {
    /// Pushes a bitmap to the device.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Render`] if the write fails.
    fn show(&mut self, bitmap: &RgbImage) -> Result<()>;
}

impl<T: DisplaySink + ?Sized> DisplaySink for Box<T> {
    fn show(&mut self, bitmap: &RgbImage) -> Result<()> {
        (**self).show(bitmap)
    }
}

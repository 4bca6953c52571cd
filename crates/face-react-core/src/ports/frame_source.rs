//! Frame source port for pulling camera frames.

use crate::domain::Frame;
use crate::error::Result;

/// Port for a device that yields frames on demand.
///
/// A source is opened once by its constructor and released once with
/// [`FrameSource::release`].
pub trait FrameSource {
    /// Blocks until the next frame is available.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Capture`] if the device is unavailable.
    fn next_frame(&mut self) -> Result<Frame>;

    /// Releases the underlying device. Further calls to `next_frame` fail.
    fn release(&mut self) {}
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn next_frame(&mut self) -> Result<Frame> {
        (**self).next_frame()
    }

    fn release(&mut self) {
        (**self).release();
    }
}

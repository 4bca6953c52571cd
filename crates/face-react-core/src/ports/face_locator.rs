//! Face locator port.

use crate::domain::{FaceRegion, Frame};

/// Port for finding faces in a frame.
///
/// Detection parameters are fixed when the locator is built. Implementations
/// must not fail on a correctly sized frame; an empty vector means no face
/// passed the detector's own threshold.
pub trait FaceLocator {
    /// Returns face regions in the detector's scan order.
    fn locate(&mut self, frame: &Frame) -> Vec<FaceRegion>;
}

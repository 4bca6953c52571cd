//! Port definitions for hexagonal architecture.
//!
//! Each external collaborator of the reaction loop sits behind one of these
//! traits so hardware can be swapped for test doubles.

mod display_sink;
mod emotion_classifier;
mod face_locator;
mod frame_source;

pub use display_sink::DisplaySink;
pub use emotion_classifier::EmotionClassifier;
pub use face_locator::FaceLocator;
pub use frame_source::FrameSource;

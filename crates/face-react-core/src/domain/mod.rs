//! Core domain types for the reaction loop.

mod emotion;
mod frame;

pub use emotion::{ClassificationResult, EmotionDistribution, EmotionLabel, UnknownLabel};
pub use frame::{FaceCrop, FaceRegion, Frame, CROP_SIZE, FRAME_HEIGHT, FRAME_WIDTH};

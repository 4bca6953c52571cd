//! Face React Core - Domain logic and the reaction loop
//!
//! This crate contains the domain types, the ports behind which camera,
//! detector, classifier and display live, the candle emotion network, the eye
//! pattern renderer and the debounced controller that ties them together.

pub mod controller;
pub mod domain;
pub mod error;
pub mod inference;
pub mod ports;
pub mod render;
pub mod shutdown;

pub use controller::{CycleOutcome, ReactionConfig, ReactionController, RunSummary};
pub use domain::{
    ClassificationResult, EmotionDistribution, EmotionLabel, FaceCrop, FaceRegion, Frame,
};
pub use error::{Error, Result};
pub use ports::{DisplaySink, EmotionClassifier, FaceLocator, FrameSource};
pub use render::ExpressionRenderer;
pub use shutdown::Shutdown;

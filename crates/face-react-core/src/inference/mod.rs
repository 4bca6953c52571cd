//! ML inference engine using Candle.
//!
//! Provides weight loading and the emotion classifier network.

mod device;
mod emotion_net;
mod loader;
mod utils;

pub use device::select_device;
pub use emotion_net::{CnnEmotionClassifier, EmotionNet};
pub use loader::load_weights;
pub use utils::to_distribution;

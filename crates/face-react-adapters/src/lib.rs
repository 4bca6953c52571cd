//! Face React Adapters - Hardware and filesystem adapters for face-react.
//!
//! This crate provides adapters for:
//! - Camera capture (behind the `camera` feature)
//! - Replaying saved frames from disk
//! - SeetaFace face detection
//! - Framebuffer and PNG snapshot displays
//! - Model downloading and caching

#[cfg(feature = "camera")]
pub mod camera;
pub mod detector;
pub mod display;
pub mod models;
pub mod replay;

#[cfg(feature = "camera")]
pub use camera::CameraSource;
pub use detector::SeetaFaceLocator;
pub use display::{FramebufferDisplay, SnapshotDisplay};
pub use models::{default_models_dir, ModelStore};
pub use replay::ReplaySource;

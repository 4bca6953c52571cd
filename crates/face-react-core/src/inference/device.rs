//! Device selection for inference.

use candle_core::Device;
use tracing::info;

/// Returns the device the emotion model runs on.
///
/// Prefers Metal or CUDA when compiled with the matching feature and a GPU is
/// present, otherwise the CPU.
#[must_use]
pub fn select_device() -> Device {
    #[cfg(feature = "metal")]
    {
        if let Ok(device) = Device::new_metal(0) {
            info!("Emotion model running on Metal");
            return device;
        }
    }

    #[cfg(feature = "cuda")]
    {
        if let Ok(device) = Device::new_cuda(0) {
            info!("Emotion model running on CUDA");
            return device;
        }
    }

    info!("Emotion model running on CPU");
    Device::Cpu
}

//! Display sinks: the Linux framebuffer exposed by the TFT driver, and a PNG
//! snapshot file for headless runs.

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use face_react_core::error::{Error, Result};
use face_react_core::ports::DisplaySink;
use image::RgbImage;
use tracing::{debug, info};

/// Packs one pixel as RGB565.
#[must_use]
pub const fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3)
}

/// Converts a bitmap to little-endian RGB565 rows.
#[must_use]
pub fn to_rgb565_le(bitmap: &RgbImage) -> Vec<u8> {
    bitmap
        .pixels()
        .flat_map(|p| rgb565(p[0], p[1], p[2]).to_le_bytes())
        .collect()
}

/// Writes bitmaps to a 16 bpp framebuffer device such as `/dev/fb1`.
///
/// The fbtft ILI9341 driver exposes the panel this way, already configured
/// for the landscape mounting.
pub struct FramebufferDisplay {
    path: PathBuf,
    device: File,
    width: u32,
    height: u32,
}

impl FramebufferDisplay {
    /// Opens the framebuffer for writing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the device cannot be opened.
    pub fn open(path: &Path, width: u32, height: u32) -> Result<Self> {
        let device = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|e| Error::Render(format!("cannot open {}: {e}", path.display())))?;
        info!("Framebuffer {} opened ({width}x{height})", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            device,
            width,
            height,
        })
    }
}

impl DisplaySink for FramebufferDisplay {
    fn show(&mut self, bitmap: &RgbImage) -> Result<()> {
        if bitmap.dimensions() != (self.width, self.height) {
            return Err(Error::Render(format!(
                "bitmap is {}x{}, display is {}x{}",
                bitmap.width(),
                bitmap.height(),
                self.width,
                self.height
            )));
        }

        let data = to_rgb565_le(bitmap);
        self.device
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.device.write_all(&data))
            .and_then(|()| self.device.flush())
            .map_err(|e| Error::Render(format!("{}: {e}", self.path.display())))
    }
}

/// Saves every bitmap to one PNG file, overwriting the previous one.
pub struct SnapshotDisplay {
    path: PathBuf,
    writes: u64,
}

impl SnapshotDisplay {
    /// Creates a sink writing to `path`; nothing is written until the first show.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writes: 0,
        }
    }

    /// Number of bitmaps written so far.
    #[must_use]
    pub const fn writes(&self) -> u64 {
        self.writes
    }
}

impl DisplaySink for SnapshotDisplay {
    fn show(&mut self, bitmap: &RgbImage) -> Result<()> {
        bitmap
            .save(&self.path)
            .map_err(|e| Error::Render(format!("{}: {e}", self.path.display())))?;
        self.writes += 1;
        debug!("Snapshot {} written to {}", self.writes, self.path.display());
        Ok(())
    }
}

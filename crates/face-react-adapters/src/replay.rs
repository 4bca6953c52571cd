//! Filesystem frame source that replays still images as camera frames.

use std::path::{Path, PathBuf};

use face_react_core::domain::Frame;
use face_react_core::error::{Error, Result};
use face_react_core::ports::FrameSource;
use tracing::{debug, info, warn};

/// Image extensions accepted for replay.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Replays image files in order, wrapping around at the end.
///
/// Useful for running the loop on a machine without a camera, and for
/// reproducing a detection problem from saved frames.
pub struct ReplaySource {
    files: Vec<PathBuf>,
    position: usize,
    released: bool,
}

impl ReplaySource {
    /// Creates a source from files and directories.
    ///
    /// # Arguments
    ///
    /// * `paths` - Files or directories to scan (directories are read one
    ///   level deep, sorted by name)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Capture`] if no readable image file was found.
    pub fn new(paths: &[PathBuf]) -> Result<Self> {
        let files = collect_files(paths);
        if files.is_empty() {
            return Err(Error::Capture("no replayable images found".into()));
        }
        info!("Replaying {} image file(s)", files.len());
        Ok(Self {
            files,
            position: 0,
            released: false,
        })
    }

    /// Files in replay order.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

impl FrameSource for ReplaySource {
    fn next_frame(&mut self) -> Result<Frame> {
        if self.released {
            return Err(Error::Capture("replay source was released".into()));
        }
        let path = &self.files[self.position];
        self.position = (self.position + 1) % self.files.len();

        debug!("Replaying {}", path.display());
        let image = image::open(path)
            .map_err(|e| Error::Capture(format!("{}: {e}", path.display())))?;
        Ok(Frame::new(image.to_rgb8()))
    }

    fn release(&mut self) {
        debug!("Releasing replay source");
        self.released = true;
    }
}

fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_supported_image(path) {
                files.push(path.clone());
            } else {
                warn!("Unsupported file type: {}", path.display());
            }
        } else if path.is_dir() {
            collect_from_dir(path, &mut files);
        } else {
            warn!("Path does not exist: {}", path.display());
        }
    }

    files
}

fn collect_from_dir(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            warn!("Failed to read directory {}: {e}", dir.display());
            return;
        }
    };

    let mut found: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {e}", dir.display());
                None
            }
        })
        .filter(|path| path.is_file() && is_supported_image(path))
        .collect();
    found.sort();
    files.extend(found);
}

/// Checks if a path has a supported image extension.
fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

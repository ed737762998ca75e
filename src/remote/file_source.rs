use super::types::FrameSource;
use crate::error::RemoteError;
use image::RgbImage;
use std::path::{Path, PathBuf};

/// Frame source reading the screen from an image file.
///
/// The file is decoded again on every capture so an external process can
/// keep replacing it (e.g. a screenshot loop), like a live screen would change.
#[derive(Debug, Clone)]
pub struct FileFrameSource {
    path: PathBuf,
    index: u64, // sequential capture count
}

impl FileFrameSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            index: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of captures taken so far
    pub fn captures(&self) -> u64 {
        self.index
    }
}

impl FrameSource for FileFrameSource {
    fn capture(&mut self) -> Result<RgbImage, RemoteError> {
        let start = std::time::Instant::now();
        let frame = image::open(&self.path)
            .map_err(|e| format!("Failed to read screen {}: {e}", self.path.display()))?
            .to_rgb8();
        self.index += 1;
        log::debug!(
            "📸 Capture #{} from {} ({}x{}, {}ms)",
            self.index,
            self.path.display(),
            frame.width(),
            frame.height(),
            start.elapsed().as_millis()
        );
        Ok(frame)
    }
}

//! Scoped scratch-file staging for the normalized image.
//!
//! One uniquely named PNG per request, so concurrent requests never touch
//! each other's files. The file is deleted when the guard drops, on every
//! exit path; deletion failures are logged and swallowed so they never
//! replace the response already determined.

use image::{DynamicImage, ImageFormat};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

/// RAII guard owning one on-disk PNG staging copy of a request's image.
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Serialize `image` as PNG under `dir` with a unique per-request name.
    pub fn write_png(dir: &Path, image: &DynamicImage) -> Result<Self, image::ImageError> {
        let path = dir.join(format!("ocr-{}.png", Uuid::new_v4()));
        image.save_with_format(&path, ImageFormat::Png)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(
                "failed to remove scratch file {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

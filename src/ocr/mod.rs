//! OCR engine abstraction.
//!
//! The engine is an injected collaborator with a single operation so the
//! HTTP layer can run against a test double. The shipped backend is
//! Tesseract via leptess.

pub mod tesseract;

use image::DynamicImage;
use thiserror::Error;

/// Engine-level failures. Detail is logged server-side, never returned to
/// clients.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("engine initialization failed: {0}")]
    Init(String),

    #[error("recognition failed: {0}")]
    Recognition(String),
}

/// Async trait implemented by each OCR backend.
#[async_trait::async_trait]
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Recognize text in an alpha-free image. Returns the raw engine output,
    /// untrimmed.
    async fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

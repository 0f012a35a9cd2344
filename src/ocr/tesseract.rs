//! Tesseract OCR backend.

use super::{OcrEngine, OcrError};
use crate::config::OcrConfig;
use image::{DynamicImage, ImageFormat};
use leptess::LepTess;
use std::io::Cursor;
use tracing::info;

pub struct TesseractEngine {
    tessdata_dir: Option<String>,
    language: String,
}

impl TesseractEngine {
    /// Probe Tesseract once at startup so a missing installation or language
    /// pack fails fast instead of on the first request.
    pub fn new(config: &OcrConfig) -> Result<Self, OcrError> {
        LepTess::new(config.tessdata_dir.as_deref(), &config.language).map_err(|e| {
            OcrError::Init(format!(
                "failed to initialize Tesseract with language '{}': {}",
                config.language, e
            ))
        })?;

        info!("Tesseract initialized (language: {})", config.language);

        Ok(Self {
            tessdata_dir: config.tessdata_dir.clone(),
            language: config.language.clone(),
        })
    }
}

#[async_trait::async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        // leptess expects encoded image data, so stage a PNG in memory
        let mut png = Cursor::new(Vec::new());
        image
            .write_to(&mut png, ImageFormat::Png)
            .map_err(|e| OcrError::Recognition(format!("PNG encode failed: {}", e)))?;

        let tessdata_dir = self.tessdata_dir.clone();
        let language = self.language.clone();
        let bytes = png.into_inner();

        // LepTess holds raw pointers; a fresh instance is created and dropped
        // entirely on the blocking pool
        tokio::task::spawn_blocking(move || {
            let mut lt = LepTess::new(tessdata_dir.as_deref(), &language)
                .map_err(|e| OcrError::Init(format!("failed to initialize Tesseract: {}", e)))?;

            lt.set_image_from_mem(&bytes)
                .map_err(|e| OcrError::Recognition(format!("failed to set image: {}", e)))?;

            lt.get_utf8_text()
                .map_err(|e| OcrError::Recognition(format!("text extraction failed: {}", e)))
        })
        .await
        .map_err(|e| OcrError::Recognition(format!("OCR task failed: {}", e)))?
    }
}

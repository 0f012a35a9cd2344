//! Environment-driven configuration.
//!
//! Values come from the process environment (a `.env` file is loaded at
//! startup). Every field has a default; `validate()` rejects values the
//! pipeline cannot run with.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OCR timeout must be > 0 seconds")]
    InvalidOcrTimeout,

    #[error("OCR language must not be empty")]
    InvalidOcrLanguage,

    #[error("Scratch directory does not exist: {0}")]
    InvalidScratchDir(String),
}

/// Listening address.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// OCR engine settings.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub language: String,
    pub tessdata_dir: Option<String>,
    /// Deadline for one recognition call.
    pub timeout: Duration,
}

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    /// Directory receiving per-request scratch PNGs.
    pub scratch_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::load_from_env();
        config.validate()?;
        Ok(config)
    }

    fn load_from_env() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5001),
            },
            ocr: OcrConfig {
                language: env::var("OCR_LANGUAGE").unwrap_or_else(|_| "eng".to_string()),
                tessdata_dir: env::var("TESSDATA_DIR").ok().filter(|s| !s.is_empty()),
                timeout: Duration::from_secs(
                    env::var("OCR_TIMEOUT_SECS")
                        .ok()
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(30),
                ),
            },
            scratch_dir: env::var("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ocr.timeout.is_zero() {
            return Err(ConfigError::InvalidOcrTimeout);
        }
        if self.ocr.language.trim().is_empty() {
            return Err(ConfigError::InvalidOcrLanguage);
        }
        if !self.scratch_dir.is_dir() {
            return Err(ConfigError::InvalidScratchDir(
                self.scratch_dir.display().to_string(),
            ));
        }
        Ok(())
    }
}

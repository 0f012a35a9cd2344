//! Request-terminal error taxonomy.
//!
//! Every pipeline failure is converted at the point of detection into one of
//! these variants and rendered as an `{"error": ...}` JSON body. The
//! `Display` strings are the client-facing messages; engine and library
//! detail stays in the server logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Classified outcome of a failed extraction request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Invalid JSON data")]
    InvalidJson,

    #[error("No image data provided")]
    MissingImage,

    #[error("Invalid image data")]
    InvalidImageData,

    #[error("File size too large (max 5MB)")]
    FileTooLarge,

    #[error("Invalid image format")]
    InvalidImageFormat,

    #[error("Error processing image")]
    OcrEngineFailure,

    #[error("OCR processing timed out")]
    Timeout,

    #[error("No text found in image")]
    NoTextFound,
}

impl ExtractError {
    pub fn status(&self) -> StatusCode {
        match self {
            ExtractError::OcrEngineFailure | ExtractError::Timeout => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ExtractError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

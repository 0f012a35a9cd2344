//! Validation and normalization stages between the network input and the
//! OCR engine.
//!
//! The stages run in a strict order: data-URI decode, size guard, container
//! sniffing, alpha flattening. Each gate returns a classified
//! [`ExtractError`]; later stages assume earlier ones have passed.

use crate::error::ExtractError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::DynamicImage;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Decoded payloads above this many bytes are rejected before any image work.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const DATA_URI_PREFIX: &str = "data:image/";

fn data_uri_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"^data:image/[^;,]+;base64,").expect("literal pattern must compile")
    })
}

/// Strip the `data:image/<subtype>;base64,` prefix and decode the payload.
///
/// The subtype token is not validated against a whitelist. If the base64
/// marker is missing, the value passes through unchanged and decoding fails.
pub fn decode_image_payload(value: &str) -> Result<Vec<u8>, ExtractError> {
    if !value.starts_with(DATA_URI_PREFIX) {
        return Err(ExtractError::InvalidImageData);
    }

    let encoded = data_uri_marker().replace(value, "");
    BASE64.decode(encoded.as_bytes()).map_err(|e| {
        debug!("base64 decode failed: {}", e);
        ExtractError::InvalidImageData
    })
}

/// Reject payloads above [`MAX_IMAGE_BYTES`]. Runs before image parsing so
/// oversized input never reaches the decoder.
pub fn enforce_size_limit(bytes: &[u8]) -> Result<(), ExtractError> {
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ExtractError::FileTooLarge);
    }
    Ok(())
}

/// Parse raw bytes as an image, sniffing the container format from content.
/// Client-supplied subtype labels are ignored.
pub fn load_image(bytes: &[u8]) -> Result<DynamicImage, ExtractError> {
    image::load_from_memory(bytes).map_err(|e| {
        debug!("image decode failed: {}", e);
        ExtractError::InvalidImageFormat
    })
}

/// Drop the alpha channel, keeping bit depth and gray/color mode.
///
/// Grayscale stays grayscale and already-opaque images pass through
/// untouched. Tesseract expects flat color data.
pub fn flatten_alpha(image: DynamicImage) -> DynamicImage {
    if !image.color().has_alpha() {
        return image;
    }

    match image {
        DynamicImage::ImageLumaA8(_) => DynamicImage::ImageLuma8(image.to_luma8()),
        DynamicImage::ImageLumaA16(_) => DynamicImage::ImageLuma16(image.to_luma16()),
        DynamicImage::ImageRgba16(_) => DynamicImage::ImageRgb16(image.to_rgb16()),
        DynamicImage::ImageRgba32F(_) => DynamicImage::ImageRgb32F(image.to_rgb32f()),
        _ => DynamicImage::ImageRgb8(image.to_rgb8()),
    }
}

//! Image encoding for the transform pipeline.
//!
//! A cropped image is re-encoded in the source file's original media type,
//! so both JPEG and PNG encoders live here behind a single
//! [`OutputFormat`] selector. Validation (non-zero dimensions, pixel
//! buffer length) is shared and runs before any encoder is touched.

mod jpeg;
mod png;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

use thiserror::Error;

/// Errors that can occur during image encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The source file's media type has no matching encoder
    #[error("No encoder for media type: {0}")]
    UnsupportedMediaType(String),

    /// The underlying encoder produced no output
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Output encoding selected from a source file's media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JPEG, encoded with a quality parameter.
    Jpeg,
    /// PNG, lossless, no quality parameter.
    Png,
}

impl OutputFormat {
    /// Map a MIME type to its encoder, if one exists.
    pub fn from_media_type(media_type: &str) -> Option<OutputFormat> {
        match media_type {
            "image/jpeg" | "image/jpg" => Some(OutputFormat::Jpeg),
            "image/png" => Some(OutputFormat::Png),
            _ => None,
        }
    }
}

/// Validate dimensions and pixel buffer length for an RGB encode.
fn validate_rgb_input(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    Ok(())
}

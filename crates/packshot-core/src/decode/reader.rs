//! Byte-level image reading with format sniffing.

use std::io::Cursor;

use image::ImageReader;

use super::{DecodeError, DecodedImage};

/// Decode an image from raw file bytes into 8-bit RGB.
///
/// The format is guessed from the content, not from the filename or the
/// reported media type.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidFormat`] when no known format matches the
/// bytes, and [`DecodeError::CorruptedFile`] when a recognized image fails
/// to decode.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    Ok(DecodedImage::from_rgb_image(img.into_rgb8()))
}

//! Single-image transform: decode, crop, re-encode.
//!
//! One call of [`transform`] handles one batch item. Without a crop it is a
//! pass-through of the original bytes; with a crop it decodes the source,
//! copies exactly the selected region onto a fresh surface (1:1, no
//! scaling), and re-encodes it in the source's original media type. All
//! working buffers are scoped to the call and released on both the success
//! and failure path.
//!
//! Failures here are strictly per-item: the batch pipeline catches a
//! [`TransformError`] and degrades that item to its unmodified original.

mod region;

pub use region::extract_region;

use thiserror::Error;

use crate::crop::CropArea;
use crate::decode::{decode_image, DecodeError};
use crate::encode::{encode_jpeg, encode_png, EncodeError, OutputFormat};
use crate::SourceFile;

/// JPEG quality for re-encoded crops, on the encoder's 1-100 scale.
const EXPORT_QUALITY: u8 = 95;

/// Errors that can occur while transforming a single image.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The source bytes could not be decoded as an image.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Re-encoding the cropped surface failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The crop rectangle does not overlap this image at all.
    ///
    /// The batch's single crop area was committed against a reference
    /// image; an image small enough to miss it entirely cannot be cropped
    /// meaningfully.
    #[error("crop region lies outside the image bounds")]
    RegionOutsideImage,
}

/// Transform one source file, optionally applying a crop.
///
/// # Arguments
///
/// * `file` - The source file (bytes, name, media type)
/// * `crop` - Crop region in natural coordinates, or `None` to pass the
///   file through unmodified
///
/// # Returns
///
/// The output bytes for this item: the original content when `crop` is
/// `None`, otherwise the cropped image re-encoded in the source's media
/// type (JPEG at quality 95, PNG lossless).
///
/// # Errors
///
/// [`TransformError::Decode`] when the bytes are not a decodable image,
/// [`TransformError::Encode`] when the media type has no encoder or the
/// encoder fails, and [`TransformError::RegionOutsideImage`] when the crop
/// misses the image entirely. All are recoverable per item.
pub async fn transform(
    file: &SourceFile,
    crop: Option<&CropArea>,
) -> Result<Vec<u8>, TransformError> {
    let Some(area) = crop else {
        return Ok(file.bytes.clone());
    };

    let format = OutputFormat::from_media_type(&file.media_type)
        .ok_or_else(|| EncodeError::UnsupportedMediaType(file.media_type.clone()))?;

    let decoded = decode_image(&file.bytes)?;
    let cropped = extract_region(&decoded, area).ok_or(TransformError::RegionOutsideImage)?;

    let bytes = match format {
        OutputFormat::Jpeg => encode_jpeg(&cropped.pixels, cropped.width, cropped.height, EXPORT_QUALITY)?,
        OutputFormat::Png => encode_png(&cropped.pixels, cropped.width, cropped.height)?,
    };

    Ok(bytes)
}

//! Packshot Core - batch rename, crop, and archive library
//!
//! This crate provides the core functionality for Packshot: converting an
//! on-screen crop selection into source-image coordinates, generating
//! sequential output filenames, cropping and re-encoding individual images,
//! and packing a whole batch into a single downloadable archive.

pub mod crop;
pub mod decode;
pub mod encode;
pub mod naming;
pub mod pipeline;
pub mod transform;

pub use crop::{to_natural, CropArea, CropSession, DisplayRect, Handle, ScaleFactors};
pub use pipeline::{BatchOutput, ItemFallback, PackagingError};
pub use transform::{transform, TransformError};

/// One input file as supplied by the host.
///
/// `media_type` is the MIME type reported by the file source (for example
/// `image/jpeg`). It selects the output encoding when a crop is applied;
/// the decoder sniffs the actual format from the bytes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SourceFile {
    /// Original filename, used for extension extraction.
    pub name: String,
    /// MIME type of the file content.
    pub media_type: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl SourceFile {
    /// Create a new SourceFile.
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Whether the reported media type is an image type.
    ///
    /// The file source uses this to filter dropped files before they enter
    /// the batch; it is a label check only, not a content check.
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

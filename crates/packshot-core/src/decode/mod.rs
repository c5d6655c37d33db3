//! Image decoding for the transform pipeline.
//!
//! Decoding is content-sniffed: the reader guesses the format from the
//! bytes rather than trusting the reported media type, so a mislabeled
//! upload surfaces as a per-item [`DecodeError`] instead of corrupt
//! output. All decoded images are normalized to 8-bit RGB.

mod reader;
mod types;

pub use reader::decode_image;
pub use types::{DecodeError, DecodedImage};

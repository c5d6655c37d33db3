//! Zip packing for the completed batch.

use std::io::{Cursor, Write};

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Errors that can occur while assembling the archive.
///
/// Any of these is fatal for the whole batch: no partial archive is ever
/// delivered.
#[derive(Debug, Error)]
pub enum PackagingError {
    /// Writing one entry into the archive failed.
    #[error("failed to add archive entry '{name}': {message}")]
    Entry { name: String, message: String },

    /// Finalizing the archive structure failed.
    #[error("failed to finalize archive: {0}")]
    Finalize(String),
}

/// Pack `(filename, bytes)` entries into a single zip buffer.
///
/// Entries are stored uncompressed - the payloads are already-compressed
/// JPEG/PNG data. Filenames are unique by construction (sequence-number
/// suffixes), so insertion order carries no meaning.
pub fn pack(entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>, PackagingError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (name, bytes) in entries {
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| PackagingError::Entry {
                name: name.clone(),
                message: e.to_string(),
            })?;
        writer.write_all(bytes).map_err(|e| PackagingError::Entry {
            name: name.clone(),
            message: e.to_string(),
        })?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| PackagingError::Finalize(e.to_string()))?;
    Ok(cursor.into_inner())
}

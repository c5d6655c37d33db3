//! Batch pipeline: rename, transform, and pack an ordered file list.
//!
//! The pipeline fans out one [`transform`](crate::transform::transform) per
//! file, all launched concurrently and joined as a unit - item `i` never
//! depends on, blocks on, or observes item `j`. A failed transform degrades
//! that one item to its unmodified original bytes; only archive assembly
//! itself can fail the batch. There is no cancellation and no timeout:
//! every item resolves (success or fallback) before packing starts.
//!
//! The caller owns the externally visible busy signal and toggles it
//! around the whole invocation; this function guarantees resolution on
//! every path so that signal always clears.

mod archive;

pub use archive::PackagingError;

use futures_util::future::join_all;

use crate::crop::CropArea;
use crate::naming;
use crate::transform::{transform, TransformError};
use crate::SourceFile;

/// One item that degraded to its original content.
///
/// Fallbacks are invisible in the archive itself (the entry is present
/// under its generated name, just uncropped); hosts surface them through
/// their own logging.
#[derive(Debug)]
pub struct ItemFallback {
    /// Position of the item in the input order.
    pub index: usize,
    /// The generated output filename of the item.
    pub filename: String,
    /// Why the transform was abandoned.
    pub error: TransformError,
}

/// The completed batch, ready for delivery.
#[derive(Debug)]
pub struct BatchOutput {
    /// Suggested filename for the archive, derived from the title.
    pub archive_name: String,
    /// The packed zip content.
    pub archive_bytes: Vec<u8>,
    /// Items that fell back to their original bytes.
    pub fallbacks: Vec<ItemFallback>,
}

/// Run the batch: rename every file, apply the crop where possible, and
/// pack everything into one archive.
///
/// # Arguments
///
/// * `files` - Snapshot of the ordered input list; order fixes each item's
///   sequence number
/// * `title` - Batch title driving both entry names and the archive name
/// * `crop` - The single committed crop area, applied identically to every
///   image, or `None` for rename-only
///
/// # Errors
///
/// Only [`PackagingError`] - per-item transform failures are handled
/// internally by falling back to the item's original content and never
/// escalate to a batch failure.
///
/// # Preconditions
///
/// The caller must reject an empty file list before invoking.
pub async fn run(
    files: &[SourceFile],
    title: &str,
    crop: Option<&CropArea>,
) -> Result<BatchOutput, PackagingError> {
    debug_assert!(!files.is_empty(), "caller must reject empty batches");

    let items = files.iter().enumerate().map(|(index, file)| async move {
        let filename = naming::generate_filename(title, index, &file.name);
        match transform(file, crop).await {
            Ok(bytes) => (index, filename, bytes, None),
            Err(error) => (index, filename, file.bytes.clone(), Some(error)),
        }
    });
    let resolved = join_all(items).await;

    let mut entries = Vec::with_capacity(resolved.len());
    let mut fallbacks = Vec::new();
    for (index, filename, bytes, error) in resolved {
        if let Some(error) = error {
            fallbacks.push(ItemFallback {
                index,
                filename: filename.clone(),
                error,
            });
        }
        entries.push((filename, bytes));
    }

    let archive_bytes = archive::pack(&entries)?;
    Ok(BatchOutput {
        archive_name: naming::archive_file_name(title),
        archive_bytes,
        fallbacks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_png;
    use std::collections::HashSet;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn png_source(name: &str, width: u32, height: u32, fill: u8) -> SourceFile {
        let pixels = vec![fill; width as usize * height as usize * 3];
        let bytes = encode_png(&pixels, width, height).unwrap();
        SourceFile::new(name, "image/png", bytes)
    }

    fn unpack(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut entries = Vec::new();
        for i in 0..archive.len() {
            let mut file = archive.by_index(i).unwrap();
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            entries.push((file.name().to_string(), content));
        }
        entries
    }

    #[tokio::test]
    async fn test_rename_only_batch_preserves_bytes() {
        let files = vec![
            png_source("DSC_0001.png", 8, 8, 10),
            png_source("DSC_0002.png", 8, 8, 20),
            png_source("DSC_0003.png", 8, 8, 30),
        ];
        let output = run(&files, "Beach Trip", None).await.unwrap();

        assert!(output.fallbacks.is_empty());
        let entries = unpack(&output.archive_bytes);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].0, "beach-trip-01.png");
        assert_eq!(entries[1].0, "beach-trip-02.png");
        assert_eq!(entries[2].0, "beach-trip-03.png");
        // Without a crop every entry is byte-identical to its input.
        for (entry, file) in entries.iter().zip(&files) {
            assert_eq!(entry.1, file.bytes);
        }
    }

    #[tokio::test]
    async fn test_corrupt_item_falls_back_to_original() {
        let corrupt = SourceFile::new("broken.png", "image/png", vec![0xAB; 40]);
        let files = vec![
            png_source("a.png", 16, 16, 1),
            corrupt.clone(),
            png_source("c.png", 16, 16, 3),
        ];
        let crop = CropArea {
            x: 2,
            y: 2,
            width: 8,
            height: 8,
        };
        let output = run(&files, "Tour", Some(&crop)).await.unwrap();

        let entries = unpack(&output.archive_bytes);
        // Every item is present, the corrupt one with its original bytes.
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].0, "tour-02.png");
        assert_eq!(entries[1].1, corrupt.bytes);

        // The healthy neighbors were cropped (so re-encoded, not identical).
        assert_ne!(entries[0].1, files[0].bytes);

        assert_eq!(output.fallbacks.len(), 1);
        assert_eq!(output.fallbacks[0].index, 1);
        assert_eq!(output.fallbacks[0].filename, "tour-02.png");
    }

    #[tokio::test]
    async fn test_all_filenames_unique() {
        let files: Vec<SourceFile> = (0..12)
            .map(|i| png_source(&format!("img{i}.png"), 8, 8, i as u8))
            .collect();
        let output = run(&files, "x", None).await.unwrap();

        let entries = unpack(&output.archive_bytes);
        let names: HashSet<&String> = entries.iter().map(|(name, _)| name).collect();
        assert_eq!(names.len(), files.len());
    }

    #[tokio::test]
    async fn test_archive_name_from_title() {
        let files = vec![png_source("a.png", 8, 8, 0)];
        let output = run(&files, "5-Day Safari!", None).await.unwrap();
        assert_eq!(output.archive_name, "5_day_safari.zip");

        let output = run(&files, "", None).await.unwrap();
        assert_eq!(output.archive_name, "images.zip");
    }

    #[tokio::test]
    async fn test_crop_applies_to_every_item() {
        let files = vec![
            png_source("a.png", 32, 32, 5),
            png_source("b.png", 32, 32, 6),
        ];
        let crop = CropArea {
            x: 4,
            y: 4,
            width: 10,
            height: 12,
        };
        let output = run(&files, "t", Some(&crop)).await.unwrap();

        for (_, bytes) in unpack(&output.archive_bytes) {
            let decoded = crate::decode::decode_image(&bytes).unwrap();
            assert_eq!(decoded.width, 10);
            assert_eq!(decoded.height, 12);
        }
    }

    #[tokio::test]
    async fn test_crop_missing_small_image_degrades() {
        // The crop was committed against a large reference image; the tiny
        // item misses it entirely and ships uncropped.
        let tiny = png_source("tiny.png", 4, 4, 9);
        let files = vec![png_source("big.png", 64, 64, 1), tiny.clone()];
        let crop = CropArea {
            x: 30,
            y: 30,
            width: 20,
            height: 20,
        };
        let output = run(&files, "mix", Some(&crop)).await.unwrap();

        let entries = unpack(&output.archive_bytes);
        assert_eq!(entries[1].1, tiny.bytes);
        assert_eq!(output.fallbacks.len(), 1);
        assert!(matches!(
            output.fallbacks[0].error,
            TransformError::RegionOutsideImage
        ));
    }

    #[tokio::test]
    async fn test_sequence_numbers_follow_input_order() {
        let files: Vec<SourceFile> = (0..100)
            .map(|i| png_source(&format!("f{i}.png"), 4, 4, i as u8))
            .collect();
        let output = run(&files, "big", None).await.unwrap();

        let entries = unpack(&output.archive_bytes);
        assert_eq!(entries[98].0, "big-99.png");
        assert_eq!(entries[99].0, "big-100.png");
        // Entry content still matches input order after the concurrent join.
        assert_eq!(entries[99].1, files[99].bytes);
    }
}

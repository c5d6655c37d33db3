//! Pixel-exact region extraction.

use crate::crop::CropArea;
use crate::decode::DecodedImage;

/// Copy the sub-region `area` of `image` onto a new surface.
///
/// The copy is 1:1 - the region's top-left pixel lands at the surface
/// origin and no scaling happens. The region is intersected with the image
/// bounds first, so an image smaller than the batch's crop area yields the
/// overlapping part.
///
/// Returns `None` when the region does not overlap the image at all.
pub fn extract_region(image: &DecodedImage, area: &CropArea) -> Option<DecodedImage> {
    if area.x >= image.width || area.y >= image.height {
        return None;
    }

    let right = area.x.saturating_add(area.width).min(image.width);
    let bottom = area.y.saturating_add(area.height).min(image.height);
    let out_width = right - area.x;
    let out_height = bottom - area.y;
    if out_width == 0 || out_height == 0 {
        return None;
    }

    let row_bytes = out_width as usize * 3;
    let mut pixels = vec![0u8; out_height as usize * row_bytes];

    // Copy row by row; rows are contiguous in both buffers.
    for row in 0..out_height as usize {
        let src_y = area.y as usize + row;
        let src_start = (src_y * image.width as usize + area.x as usize) * 3;
        let dst_start = row * row_bytes;
        pixels[dst_start..dst_start + row_bytes]
            .copy_from_slice(&image.pixels[src_start..src_start + row_bytes]);
    }

    Some(DecodedImage::new(out_width, out_height, pixels))
}


// ============================================================================
// Property-Based Tests
// ============================================================================

//! Display-to-natural coordinate scaling.
//!
//! The crop tool works on a rendered image element that may be scaled down
//! from its source. A selection made in display pixels must be converted to
//! the source's natural pixel space before it can drive the transform
//! pipeline. Scale factors are derived per axis from the currently measured
//! element and are never cached across image swaps.

use serde::{Deserialize, Serialize};

/// A committed crop region in the natural pixel space of a source image.
///
/// Invariants (upheld by [`CropArea::fit_within`] at commit time, against
/// the reference image the selection was made on):
///
/// - `width >= 1` and `height >= 1`
/// - `x + width <= natural_width` and `y + height <= natural_height`
///
/// A CropArea is immutable once produced and is reused verbatim for every
/// image in a batch, including images with different dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropArea {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropArea {
    /// Clamp this area so it satisfies the CropArea invariants against an
    /// image of the given natural dimensions.
    ///
    /// Per-field rounding in [`to_natural`] can land the far edge one pixel
    /// past the image on exact .5 ties; this restores validity without
    /// changing any field in the ordinary case.
    pub fn fit_within(self, natural_width: u32, natural_height: u32) -> CropArea {
        let x = self.x.min(natural_width.saturating_sub(1));
        let y = self.y.min(natural_height.saturating_sub(1));
        CropArea {
            x,
            y,
            width: self.width.clamp(1, natural_width.saturating_sub(x).max(1)),
            height: self.height.clamp(1, natural_height.saturating_sub(y).max(1)),
        }
    }
}

/// A working crop rectangle in display (on-screen) pixel space.
///
/// Mutable state of an interaction session; it never outlives the session
/// that owns it. `w`/`h` follow the display element's naming rather than
/// the natural-space `width`/`height` to keep the two spaces distinct at
/// a glance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Per-axis display-to-natural scale factors.
///
/// Derived, not stored: recomputed from the rendered element on every
/// commit so a swapped or re-measured image can never leak a stale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
}

impl ScaleFactors {
    /// Compute the factors for an image rendered at `display_w x display_h`
    /// whose source is `natural_w x natural_h`.
    ///
    /// Callers must have measured a loaded image first; non-positive display
    /// dimensions are a precondition violation.
    pub fn between(natural_w: u32, natural_h: u32, display_w: f64, display_h: f64) -> ScaleFactors {
        debug_assert!(
            display_w > 0.0 && display_h > 0.0,
            "image must be loaded and measured before deriving scale factors"
        );
        ScaleFactors {
            x: natural_w as f64 / display_w,
            y: natural_h as f64 / display_h,
        }
    }
}

/// Convert a display rectangle to natural coordinates.
///
/// Each of x, y, width, and height is scaled by its axis factor and rounded
/// to the nearest integer independently - not derived from a rounded
/// opposite corner - so the resulting pixel counts match what the user saw.
///
/// # Arguments
///
/// * `rect` - Selection in display space
/// * `scale` - Factors from [`ScaleFactors::between`]
///
/// # Preconditions
///
/// Scale factors must be positive and finite; anything else means the
/// caller measured an unloaded image and the result is unspecified.
pub fn to_natural(rect: &DisplayRect, scale: ScaleFactors) -> CropArea {
    debug_assert!(
        scale.x.is_finite() && scale.x > 0.0 && scale.y.is_finite() && scale.y > 0.0,
        "scale factors must be positive and finite"
    );
    CropArea {
        x: (rect.x * scale.x).round() as u32,
        y: (rect.y * scale.y).round() as u32,
        width: (rect.w * scale.x).round() as u32,
        height: (rect.h * scale.y).round() as u32,
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

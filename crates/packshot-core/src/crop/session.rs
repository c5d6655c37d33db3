//! Pointer-driven crop session state machine.
//!
//! A session owns one display-space rectangle over one rendered image and
//! interprets pointer-down/move/up sequences on its nine control points
//! into rectangle mutations. States:
//!
//! ```text
//! (no session) --open--> active --pointer_down--> dragging
//!      ^                   ^  |                      |
//!      |                   |  +----- pointer_up <----+
//!      +--- cancel/commit -+
//! ```
//!
//! Every pointer event is processed to completion before the next one is
//! accepted; there are no re-entrant drag updates. Each move recomputes the
//! rectangle from the drag-start snapshot plus the cumulative pointer delta
//! rather than from the previous frame, so rounding never accumulates over
//! a long drag.
//!
//! Hosts must track the pointer globally once a drag starts (fast movement
//! outruns the rectangle) and must deliver `pointer_up` on every exit path,
//! including a missed up event on blur; `pointer_up` is idempotent to make
//! that safe.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::scale::{to_natural, CropArea, DisplayRect, ScaleFactors};

/// Minimum crop rectangle size on either axis, in display pixels.
///
/// A resize that would shrink a dimension below this is clamped, never
/// rejected.
pub const MIN_CROP_SIZE: f64 = 20.0;

/// Fraction of the displayed image covered by the initial rectangle.
const INITIAL_FRACTION: f64 = 0.8;

/// Errors that can occur when opening a crop session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The display element has not been measured yet.
    #[error("display dimensions must be positive (got {width}x{height})")]
    EmptyDisplay { width: f64, height: f64 },
}

/// One of the nine interaction targets: eight compass-direction resize
/// handles plus the rectangle body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
    Move,
}

impl Handle {
    /// Parse a handle from its host-side name (`"nw"`, `"n"`, ...,
    /// `"move"`).
    pub fn from_name(name: &str) -> Option<Handle> {
        match name {
            "n" => Some(Handle::N),
            "ne" => Some(Handle::Ne),
            "e" => Some(Handle::E),
            "se" => Some(Handle::Se),
            "s" => Some(Handle::S),
            "sw" => Some(Handle::Sw),
            "w" => Some(Handle::W),
            "nw" => Some(Handle::Nw),
            "move" => Some(Handle::Move),
            _ => None,
        }
    }

    fn touches_west(self) -> bool {
        matches!(self, Handle::W | Handle::Nw | Handle::Sw)
    }

    fn touches_east(self) -> bool {
        matches!(self, Handle::E | Handle::Ne | Handle::Se)
    }

    fn touches_north(self) -> bool {
        matches!(self, Handle::N | Handle::Ne | Handle::Nw)
    }

    fn touches_south(self) -> bool {
        matches!(self, Handle::S | Handle::Se | Handle::Sw)
    }
}

/// Snapshot taken at drag start; all moves are computed against it.
#[derive(Debug, Clone, Copy)]
struct DragState {
    handle: Handle,
    origin: (f64, f64),
    start: DisplayRect,
}

/// An interactive crop session over one displayed image.
///
/// Created in the `active` state with the rectangle covering 80% of the
/// display, centered. Consumed by [`commit`](CropSession::commit) (which
/// produces a [`CropArea`] in natural coordinates) or by
/// [`cancel`](CropSession::cancel).
#[derive(Debug)]
pub struct CropSession {
    display_w: f64,
    display_h: f64,
    natural_w: u32,
    natural_h: u32,
    rect: DisplayRect,
    drag: Option<DragState>,
}

impl CropSession {
    /// Open a session for an image rendered at `display_w x display_h`
    /// whose source is `natural_w x natural_h`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyDisplay`] when the display dimensions
    /// are not positive - the host must wait for the image to load and be
    /// measured before opening the tool.
    pub fn open(
        display_w: f64,
        display_h: f64,
        natural_w: u32,
        natural_h: u32,
    ) -> Result<CropSession, SessionError> {
        if !(display_w > 0.0) || !(display_h > 0.0) {
            return Err(SessionError::EmptyDisplay {
                width: display_w,
                height: display_h,
            });
        }

        let w = display_w * INITIAL_FRACTION;
        let h = display_h * INITIAL_FRACTION;
        Ok(CropSession {
            display_w,
            display_h,
            natural_w,
            natural_h,
            rect: DisplayRect {
                x: (display_w - w) / 2.0,
                y: (display_h - h) / 2.0,
                w,
                h,
            },
            drag: None,
        })
    }

    /// The current display-space rectangle.
    pub fn rect(&self) -> DisplayRect {
        self.rect
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The current rectangle's size in natural pixels, for the host's live
    /// dimension readout.
    pub fn natural_size(&self) -> (u32, u32) {
        let scale =
            ScaleFactors::between(self.natural_w, self.natural_h, self.display_w, self.display_h);
        (
            (self.rect.w * scale.x).round() as u32,
            (self.rect.h * scale.y).round() as u32,
        )
    }

    /// Begin a drag on `handle` with the pointer at `(x, y)`.
    ///
    /// Ignored while a drag is already in progress: events are processed to
    /// completion and a second pointer cannot splice into a running drag.
    pub fn pointer_down(&mut self, handle: Handle, x: f64, y: f64) {
        if self.drag.is_some() {
            return;
        }
        self.drag = Some(DragState {
            handle,
            origin: (x, y),
            start: self.rect,
        });
    }

    /// Update the rectangle for a pointer now at `(x, y)`.
    ///
    /// No-op outside a drag (a stray move after blur must not mutate the
    /// resting rectangle).
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let Some(drag) = self.drag else {
            return;
        };
        let dx = x - drag.origin.0;
        let dy = y - drag.origin.1;
        self.rect = apply_drag(
            drag.handle,
            drag.start,
            dx,
            dy,
            self.display_w,
            self.display_h,
        );
    }

    /// End the current drag; the rectangle at this moment becomes the new
    /// resting state. Idempotent, so hosts can call it from both the up
    /// handler and the blur/missed-up path.
    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    /// Commit the session, converting the rectangle to natural coordinates.
    ///
    /// Scale factors are derived here, from this session's measurements -
    /// never cached across image swaps. The result satisfies the CropArea
    /// invariants against this session's source image.
    pub fn commit(self) -> CropArea {
        let scale =
            ScaleFactors::between(self.natural_w, self.natural_h, self.display_w, self.display_h);
        to_natural(&self.rect, scale).fit_within(self.natural_w, self.natural_h)
    }

    /// Discard the session without producing a crop area. Any previously
    /// committed CropArea held by the caller is unaffected.
    pub fn cancel(self) {}
}

/// Clamp that tolerates an inverted range, matching pointer-tool behavior:
/// when `max < min` the upper bound wins.
fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Recompute the rectangle from the drag-start snapshot and the cumulative
/// pointer delta.
///
/// Single-edge handles move only their own edge; the opposite edge stays
/// fixed because width/height are recomputed from the moved edge. Corner
/// handles apply the horizontal and vertical rules independently in the
/// same update.
fn apply_drag(
    handle: Handle,
    start: DisplayRect,
    dx: f64,
    dy: f64,
    img_w: f64,
    img_h: f64,
) -> DisplayRect {
    let mut next = start;

    if handle == Handle::Move {
        next.x = clamp(start.x + dx, 0.0, img_w - start.w);
        next.y = clamp(start.y + dy, 0.0, img_h - start.h);
        return next;
    }

    if handle.touches_west() {
        let moved = dx.min(start.w - MIN_CROP_SIZE);
        next.x = clamp(start.x + moved, 0.0, start.x + start.w - MIN_CROP_SIZE);
        next.w = start.w - (next.x - start.x);
    }
    if handle.touches_east() {
        next.w = clamp(start.w + dx, MIN_CROP_SIZE, img_w - start.x);
    }
    if handle.touches_north() {
        let moved = dy.min(start.h - MIN_CROP_SIZE);
        next.y = clamp(start.y + moved, 0.0, start.y + start.h - MIN_CROP_SIZE);
        next.h = start.h - (next.y - start.y);
    }
    if handle.touches_south() {
        next.h = clamp(start.h + dy, MIN_CROP_SIZE, img_h - start.y);
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> CropSession {
        // 800x600 display of a 1600x1200 source: initial rect is
        // (80, 60, 640, 480).
        CropSession::open(800.0, 600.0, 1600, 1200).unwrap()
    }

    #[test]
    fn test_open_centers_initial_rect() {
        let s = session();
        let r = s.rect();
        assert_eq!(r.x, 80.0);
        assert_eq!(r.y, 60.0);
        assert_eq!(r.w, 640.0);
        assert_eq!(r.h, 480.0);
    }

    #[test]
    fn test_open_rejects_unmeasured_display() {
        assert!(matches!(
            CropSession::open(0.0, 600.0, 1600, 1200),
            Err(SessionError::EmptyDisplay { .. })
        ));
        assert!(matches!(
            CropSession::open(800.0, -1.0, 1600, 1200),
            Err(SessionError::EmptyDisplay { .. })
        ));
    }

    #[test]
    fn test_move_translates_without_resizing() {
        let mut s = session();
        s.pointer_down(Handle::Move, 400.0, 300.0);
        s.pointer_move(430.0, 280.0);
        let r = s.rect();
        assert_eq!(r.x, 110.0);
        assert_eq!(r.y, 40.0);
        assert_eq!(r.w, 640.0);
        assert_eq!(r.h, 480.0);
    }

    #[test]
    fn test_move_clamps_each_axis_independently() {
        let mut s = session();
        s.pointer_down(Handle::Move, 400.0, 300.0);
        // Way past the top-left corner: x and y both pin to 0.
        s.pointer_move(-5000.0, -5000.0);
        let r = s.rect();
        assert_eq!(r.x, 0.0);
        assert_eq!(r.y, 0.0);
        // And past the bottom-right: pinned so the rect stays inside.
        s.pointer_move(5000.0, 5000.0);
        let r = s.rect();
        assert_eq!(r.x + r.w, 800.0);
        assert_eq!(r.y + r.h, 600.0);
    }

    #[test]
    fn test_east_resize_keeps_west_edge_fixed() {
        let mut s = session();
        s.pointer_down(Handle::E, 720.0, 300.0);
        s.pointer_move(760.0, 300.0);
        let r = s.rect();
        assert_eq!(r.x, 80.0);
        assert_eq!(r.w, 680.0);
    }

    #[test]
    fn test_east_resize_clamps_to_image_edge() {
        let mut s = session();
        s.pointer_down(Handle::E, 720.0, 300.0);
        s.pointer_move(2000.0, 300.0);
        let r = s.rect();
        assert_eq!(r.x + r.w, 800.0);
    }

    #[test]
    fn test_west_resize_keeps_east_edge_fixed() {
        let mut s = session();
        let east_edge = s.rect().x + s.rect().w;
        s.pointer_down(Handle::W, 80.0, 300.0);
        s.pointer_move(150.0, 300.0);
        let r = s.rect();
        assert_eq!(r.x, 150.0);
        assert_eq!(r.x + r.w, east_edge);
    }

    #[test]
    fn test_resize_never_shrinks_below_minimum() {
        let mut s = session();
        s.pointer_down(Handle::W, 80.0, 300.0);
        // Drag the west edge far past the east edge.
        s.pointer_move(3000.0, 300.0);
        assert_eq!(s.rect().w, MIN_CROP_SIZE);

        s.pointer_up();
        s.pointer_down(Handle::N, 400.0, 60.0);
        s.pointer_move(400.0, 3000.0);
        assert_eq!(s.rect().h, MIN_CROP_SIZE);
    }

    #[test]
    fn test_corner_applies_both_axes() {
        let mut s = session();
        s.pointer_down(Handle::Se, 720.0, 540.0);
        s.pointer_move(740.0, 520.0);
        let r = s.rect();
        assert_eq!(r.w, 660.0);
        assert_eq!(r.h, 460.0);
        assert_eq!(r.x, 80.0);
        assert_eq!(r.y, 60.0);
    }

    #[test]
    fn test_moves_compute_from_snapshot_not_previous_frame() {
        let mut s = session();
        s.pointer_down(Handle::Move, 400.0, 300.0);
        for step in 1..=100 {
            s.pointer_move(400.0 + step as f64 * 0.3, 300.0);
        }
        // 100 incremental updates equal one update with the final delta.
        let mut direct = session();
        direct.pointer_down(Handle::Move, 400.0, 300.0);
        direct.pointer_move(430.0, 300.0);
        assert_eq!(s.rect(), direct.rect());
    }

    #[test]
    fn test_pointer_down_during_drag_is_ignored() {
        let mut s = session();
        s.pointer_down(Handle::E, 720.0, 300.0);
        s.pointer_move(760.0, 300.0);
        // A second down (e.g. a multi-touch stray) must not re-anchor.
        s.pointer_down(Handle::W, 0.0, 0.0);
        s.pointer_move(770.0, 300.0);
        assert_eq!(s.rect().w, 690.0);
    }

    #[test]
    fn test_pointer_up_is_idempotent() {
        let mut s = session();
        s.pointer_down(Handle::Move, 400.0, 300.0);
        s.pointer_move(420.0, 300.0);
        s.pointer_up();
        let resting = s.rect();
        s.pointer_up();
        // A move after the drag ended must not mutate the rectangle.
        s.pointer_move(9999.0, 9999.0);
        assert_eq!(s.rect(), resting);
        assert!(!s.is_dragging());
    }

    #[test]
    fn test_commit_scales_to_natural_space() {
        let s = session();
        let area = s.commit();
        // Factor 2 on both axes.
        assert_eq!(
            area,
            CropArea {
                x: 160,
                y: 120,
                width: 1280,
                height: 960
            }
        );
    }

    #[test]
    fn test_natural_size_readout() {
        let s = session();
        assert_eq!(s.natural_size(), (1280, 960));
    }

    #[test]
    fn test_handle_from_name() {
        assert_eq!(Handle::from_name("nw"), Some(Handle::Nw));
        assert_eq!(Handle::from_name("move"), Some(Handle::Move));
        assert_eq!(Handle::from_name("center"), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn handle_strategy() -> impl Strategy<Value = Handle> {
        prop_oneof![
            Just(Handle::N),
            Just(Handle::Ne),
            Just(Handle::E),
            Just(Handle::Se),
            Just(Handle::S),
            Just(Handle::Sw),
            Just(Handle::W),
            Just(Handle::Nw),
            Just(Handle::Move),
        ]
    }

    /// Display sizes comfortably above the minimum crop size, so the
    /// initial 80% rectangle is always resizable.
    fn display_strategy() -> impl Strategy<Value = (f64, f64)> {
        (64.0f64..=1920.0, 64.0f64..=1080.0)
    }

    proptest! {
        /// Property: after any single drag, the rectangle stays within the
        /// display bounds and above the minimum size on both axes.
        #[test]
        fn prop_drag_preserves_bounds_and_minimum(
            (disp_w, disp_h) in display_strategy(),
            handle in handle_strategy(),
            dx in -4000.0f64..=4000.0,
            dy in -4000.0f64..=4000.0,
        ) {
            let mut s = CropSession::open(disp_w, disp_h, 4000, 3000).unwrap();
            let r0 = s.rect();
            s.pointer_down(handle, r0.x, r0.y);
            s.pointer_move(r0.x + dx, r0.y + dy);
            let r = s.rect();

            prop_assert!(r.x >= 0.0);
            prop_assert!(r.y >= 0.0);
            prop_assert!(r.x + r.w <= disp_w + 1e-9);
            prop_assert!(r.y + r.h <= disp_h + 1e-9);
            prop_assert!(r.w >= MIN_CROP_SIZE.min(r0.w));
            prop_assert!(r.h >= MIN_CROP_SIZE.min(r0.h));
        }

        /// Property: single-edge handles never move the opposite edge.
        #[test]
        fn prop_opposite_edge_stays_fixed(
            (disp_w, disp_h) in display_strategy(),
            dx in -4000.0f64..=4000.0,
            dy in -4000.0f64..=4000.0,
        ) {
            let mut s = CropSession::open(disp_w, disp_h, 4000, 3000).unwrap();
            let r0 = s.rect();

            s.pointer_down(Handle::W, r0.x, r0.y);
            s.pointer_move(r0.x + dx, r0.y + dy);
            let r = s.rect();
            prop_assert!((r.x + r.w - (r0.x + r0.w)).abs() < 1e-9);
            prop_assert_eq!(r.y, r0.y);
            prop_assert_eq!(r.h, r0.h);

            s.pointer_up();
            let r1 = s.rect();
            s.pointer_down(Handle::S, r1.x, r1.y);
            s.pointer_move(r1.x + dx, r1.y + dy);
            let r2 = s.rect();
            prop_assert_eq!(r2.y, r1.y);
            prop_assert_eq!(r2.x, r1.x);
            prop_assert_eq!(r2.w, r1.w);
        }

        /// Property: committing after any drag yields a CropArea within the
        /// source image bounds.
        #[test]
        fn prop_commit_stays_in_natural_bounds(
            (disp_w, disp_h) in display_strategy(),
            handle in handle_strategy(),
            dx in -4000.0f64..=4000.0,
            dy in -4000.0f64..=4000.0,
            nat_w in 100u32..=8000,
            nat_h in 100u32..=8000,
        ) {
            let mut s = CropSession::open(disp_w, disp_h, nat_w, nat_h).unwrap();
            let r0 = s.rect();
            s.pointer_down(handle, r0.x, r0.y);
            s.pointer_move(r0.x + dx, r0.y + dy);
            s.pointer_up();
            let area = s.commit();

            prop_assert!(area.width >= 1);
            prop_assert!(area.height >= 1);
            prop_assert!(area.x + area.width <= nat_w);
            prop_assert!(area.y + area.height <= nat_h);
        }
    }
}

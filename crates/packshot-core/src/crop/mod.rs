//! Interactive crop selection.
//!
//! This module owns the two halves of the crop tool:
//!
//! - [`scale`] - conversion between the on-screen ("display") coordinate
//!   space of a rendered image and the full-resolution ("natural") space of
//!   its source file.
//! - [`session`] - the pointer-driven state machine that turns drags on the
//!   nine control points (eight compass handles plus the rectangle body)
//!   into a display-space rectangle, and commits it as a [`CropArea`].
//!
//! A committed [`CropArea`] is always expressed in natural coordinates and
//! is applied uniformly to every image in a batch.

mod scale;
mod session;

pub use scale::{to_natural, CropArea, DisplayRect, ScaleFactors};
pub use session::{CropSession, Handle, SessionError, MIN_CROP_SIZE};

//! Crop tool bindings with global pointer tracking.
//!
//! The host opens a [`CropTool`] over the rendered image and forwards
//! pointer-downs on the nine control points. From that moment the tool
//! tracks the pointer at the window level - fast movement outruns the
//! rectangle's own region - and releases the listeners on every way out of
//! the drag: mouseup, window blur, commit, or cancel. Listener lifetime is
//! tied to a scoped [`PointerTracker`] so a missed up event can never leave
//! a dangling handler.

use std::cell::RefCell;
use std::rc::Rc;

use packshot_core::crop::{CropSession, Handle};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::MouseEvent;

/// The session is shared with the tracker's closures; `None` after the
/// tool is committed or cancelled.
type SharedSession = Rc<RefCell<Option<CropSession>>>;
type TrackerSlot = Rc<RefCell<Option<PointerTracker>>>;

/// Window-level listeners held exactly while a drag is in progress.
///
/// Dropping the tracker detaches everything; [`release_tracker`] is the
/// only way it leaves its slot.
struct PointerTracker {
    window: web_sys::Window,
    on_move: Closure<dyn FnMut(MouseEvent)>,
    on_end: Closure<dyn FnMut()>,
}

impl PointerTracker {
    /// Attach move/up/blur listeners on the window.
    fn attach(session: SharedSession, slot: TrackerSlot) -> Result<PointerTracker, JsValue> {
        let window =
            web_sys::window().ok_or_else(|| JsValue::from_str("no window to track pointer on"))?;

        let move_session = session.clone();
        let on_move = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            if let Some(session) = move_session.borrow_mut().as_mut() {
                session.pointer_move(event.client_x() as f64, event.client_y() as f64);
            }
        });

        let end_session = session.clone();
        let end_slot = slot.clone();
        let on_end = Closure::<dyn FnMut()>::new(move || {
            if let Some(session) = end_session.borrow_mut().as_mut() {
                session.pointer_up();
            }
            release_tracker(&end_slot);
        });

        window.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
        window.add_event_listener_with_callback("mouseup", on_end.as_ref().unchecked_ref())?;
        window.add_event_listener_with_callback("blur", on_end.as_ref().unchecked_ref())?;

        Ok(PointerTracker {
            window,
            on_move,
            on_end,
        })
    }

    /// Remove the listeners. Safe to call more than once.
    fn detach(&self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("mousemove", self.on_move.as_ref().unchecked_ref());
        let _ = self
            .window
            .remove_event_listener_with_callback("mouseup", self.on_end.as_ref().unchecked_ref());
        let _ = self
            .window
            .remove_event_listener_with_callback("blur", self.on_end.as_ref().unchecked_ref());
    }
}

impl Drop for PointerTracker {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Detach the tracker and drop it off the current call stack.
///
/// The end handler runs inside one of the tracker's own closures; a closure
/// must not be destroyed while it is executing, so the listeners are
/// removed immediately and the closure memory is freed in a microtask.
fn release_tracker(slot: &TrackerSlot) {
    if let Some(tracker) = slot.borrow_mut().take() {
        tracker.detach();
        wasm_bindgen_futures::spawn_local(async move {
            drop(tracker);
        });
    }
}

/// An interactive crop tool over one displayed image.
///
/// Opens in the active state with the rectangle at 80% of the display,
/// centered. `commit` converts the selection to natural coordinates and
/// closes the tool; `cancel` closes it without producing anything.
#[wasm_bindgen]
pub struct CropTool {
    session: SharedSession,
    tracker: TrackerSlot,
}

#[wasm_bindgen]
impl CropTool {
    /// Open the tool for an image rendered at `display_width x
    /// display_height` whose source is `natural_width x natural_height`.
    ///
    /// The display dimensions must come from a loaded, measured image
    /// element; opening with zero dimensions is rejected.
    #[wasm_bindgen(constructor)]
    pub fn new(
        display_width: f64,
        display_height: f64,
        natural_width: u32,
        natural_height: u32,
    ) -> Result<CropTool, JsValue> {
        let session = CropSession::open(display_width, display_height, natural_width, natural_height)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(CropTool {
            session: Rc::new(RefCell::new(Some(session))),
            tracker: Rc::new(RefCell::new(None)),
        })
    }

    /// Begin a drag on a control point (`"n"`, `"ne"`, ..., `"move"`) with
    /// the pointer at client coordinates `(x, y)`.
    ///
    /// Attaches the window-level tracker; ignored while a drag is already
    /// in progress.
    pub fn pointer_down(&self, handle: &str, x: f64, y: f64) -> Result<(), JsValue> {
        let handle = Handle::from_name(handle)
            .ok_or_else(|| JsValue::from_str(&format!("unknown control point: {handle}")))?;

        {
            let mut guard = self.session.borrow_mut();
            let session = guard.as_mut().ok_or_else(closed_error)?;
            if session.is_dragging() {
                return Ok(());
            }
            session.pointer_down(handle, x, y);
        }

        let tracker = PointerTracker::attach(self.session.clone(), self.tracker.clone())?;
        *self.tracker.borrow_mut() = Some(tracker);
        Ok(())
    }

    /// Forward a pointer position; no-op outside a drag. The global
    /// tracker makes this optional, but hosts that capture the pointer
    /// themselves can drive the session directly.
    pub fn pointer_move(&self, x: f64, y: f64) {
        if let Some(session) = self.session.borrow_mut().as_mut() {
            session.pointer_move(x, y);
        }
    }

    /// End the current drag. Idempotent.
    pub fn pointer_up(&self) {
        if let Some(session) = self.session.borrow_mut().as_mut() {
            session.pointer_up();
        }
        release_tracker(&self.tracker);
    }

    /// The current rectangle in display space, as `{x, y, w, h}`, for the
    /// host to position the crop box and its handles.
    pub fn rect(&self) -> Result<JsValue, JsValue> {
        let guard = self.session.borrow();
        let session = guard.as_ref().ok_or_else(closed_error)?;
        serde_wasm_bindgen::to_value(&session.rect()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.session
            .borrow()
            .as_ref()
            .is_some_and(|s| s.is_dragging())
    }

    /// The current selection size in natural pixels, as `[width, height]`,
    /// for the live dimension readout.
    pub fn natural_size(&self) -> Result<Vec<u32>, JsValue> {
        let guard = self.session.borrow();
        let session = guard.as_ref().ok_or_else(closed_error)?;
        let (w, h) = session.natural_size();
        Ok(vec![w, h])
    }

    /// Commit the selection, closing the tool.
    ///
    /// Returns the crop area in natural coordinates as
    /// `{x, y, width, height}`, ready to pass to `run_batch`.
    pub fn commit(self) -> Result<JsValue, JsValue> {
        release_tracker(&self.tracker);
        let session = self.session.borrow_mut().take().ok_or_else(closed_error)?;
        let area = session.commit();
        serde_wasm_bindgen::to_value(&area).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Close the tool without producing a crop area. A previously
    /// committed area held by the host is unaffected.
    pub fn cancel(self) {
        release_tracker(&self.tracker);
        if let Some(session) = self.session.borrow_mut().take() {
            session.cancel();
        }
    }
}

fn closed_error() -> JsValue {
    JsValue::from_str("crop tool is already closed")
}

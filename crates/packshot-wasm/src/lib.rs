//! Packshot WASM - WebAssembly bindings for Packshot
//!
//! This crate exposes the packshot-core functionality to the host page:
//! the interactive crop tool and the batch rename/crop/zip pipeline.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for input files and the
//!   finished archive
//! - `crop` - the crop tool session, including window-level pointer
//!   tracking while a drag is in progress
//! - `pipeline` - the batch pipeline entry point and its precondition
//!   checks
//!
//! # Usage
//!
//! ```typescript
//! import init, { CropTool, JsSourceFile, run_batch } from '@packshot/wasm';
//!
//! await init();
//!
//! const tool = new CropTool(img.width, img.height, img.naturalWidth, img.naturalHeight);
//! tool.pointer_down('se', e.clientX, e.clientY);
//! // ... the tool tracks the pointer globally until the drag ends ...
//! const crop = tool.commit();
//!
//! const files = uploads.map(f => new JsSourceFile(f.name, f.type, bytes(f)));
//! const archive = await run_batch(files, title, crop);
//! saveAs(new Blob([archive.bytes]), archive.name);
//! ```

use wasm_bindgen::prelude::*;

mod crop;
mod pipeline;
mod types;

pub use crop::CropTool;
pub use pipeline::run_batch;
pub use types::{JsArchive, JsSourceFile};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Nothing to set up yet; decoding and packing are allocation-only.
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}

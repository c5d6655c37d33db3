//! Batch pipeline bindings.
//!
//! One call processes the whole batch and resolves with the packed
//! archive. The host toggles its busy indicator around the returned
//! promise; the promise settles on every path, so the indicator always
//! clears. Per-item fallbacks are reported on the console only - the one
//! user-facing failure is a rejected promise from archive assembly.

use packshot_core::{pipeline, CropArea, SourceFile};
use wasm_bindgen::prelude::*;
use web_sys::console;

use crate::types::{JsArchive, JsSourceFile};

/// Run the batch: rename every file, apply the crop where one is given,
/// and pack everything into a single zip.
///
/// # Arguments
///
/// * `files` - The input list, in output order; consumed by the call
/// * `title` - The batch title; must not be blank
/// * `crop` - A committed crop area (`{x, y, width, height}` in natural
///   coordinates), or `null`/`undefined` for rename-only
///
/// # Errors
///
/// Rejects on caller misuse (empty list, blank title, malformed crop) and
/// on archive assembly failure. Per-item decode/encode failures never
/// reject; those items keep their original content and are listed on the
/// console.
#[wasm_bindgen]
pub async fn run_batch(
    files: Vec<JsSourceFile>,
    title: String,
    crop: JsValue,
) -> Result<JsArchive, JsValue> {
    // Caller misuse stops here; the core pipeline never sees it.
    if files.is_empty() {
        return Err(JsValue::from_str("no files to process"));
    }
    if title.trim().is_empty() {
        return Err(JsValue::from_str("a title is required"));
    }
    let crop: Option<CropArea> = serde_wasm_bindgen::from_value(crop)
        .map_err(|e| JsValue::from_str(&format!("invalid crop area: {e}")))?;

    let files: Vec<SourceFile> = files.into_iter().map(JsSourceFile::into_core).collect();

    let output = pipeline::run(&files, &title, crop.as_ref())
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    for fallback in &output.fallbacks {
        console::warn_1(
            &format!(
                "packshot: '{}' kept its original content: {}",
                fallback.filename, fallback.error
            )
            .into(),
        );
    }

    Ok(JsArchive::from_parts(output.archive_name, output.archive_bytes))
}

//! WASM-compatible wrapper types for input files and the finished archive.
//!
//! These wrap the core value types with JavaScript-friendly constructors
//! and getters, handling the byte transfer between JS and WASM memory.

use packshot_core::SourceFile;
use wasm_bindgen::prelude::*;

/// One input file handed over by the host page.
///
/// # Memory Management
///
/// The bytes are copied into WASM memory on construction. The object is
/// consumed by `run_batch`; wasm-bindgen's finalizer reclaims any file
/// that never enters a batch.
#[wasm_bindgen]
pub struct JsSourceFile {
    inner: SourceFile,
}

#[wasm_bindgen]
impl JsSourceFile {
    /// Create a new JsSourceFile.
    ///
    /// # Arguments
    /// * `name` - Original filename (drives extension extraction)
    /// * `media_type` - MIME type reported by the file source
    /// * `bytes` - Raw file content
    #[wasm_bindgen(constructor)]
    pub fn new(name: String, media_type: String, bytes: Vec<u8>) -> JsSourceFile {
        JsSourceFile {
            inner: SourceFile::new(name, media_type, bytes),
        }
    }

    /// Original filename.
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.inner.name.clone()
    }

    /// Reported MIME type.
    #[wasm_bindgen(getter)]
    pub fn media_type(&self) -> String {
        self.inner.media_type.clone()
    }

    /// Whether the reported media type is an image type; the host uses
    /// this to filter dropped files before they enter the list.
    #[wasm_bindgen(getter)]
    pub fn is_image(&self) -> bool {
        self.inner.is_image()
    }

    /// Size of the file content in bytes.
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.bytes.len()
    }
}

impl JsSourceFile {
    /// Unwrap into the core type when the batch takes ownership.
    pub(crate) fn into_core(self) -> SourceFile {
        self.inner
    }
}

/// The packed archive, ready for the host's save/download collaborator.
#[wasm_bindgen]
pub struct JsArchive {
    name: String,
    bytes: Vec<u8>,
}

#[wasm_bindgen]
impl JsArchive {
    /// Suggested filename for the download, derived from the batch title.
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.name.clone()
    }

    /// The zip content as a Uint8Array.
    ///
    /// Note: this copies the archive out of WASM memory; call it once and
    /// hand the result to the save collaborator.
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// Archive size in bytes.
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }
}

impl JsArchive {
    /// Internal constructor used by the pipeline binding.
    pub(crate) fn from_parts(name: String, bytes: Vec<u8>) -> Self {
        Self { name, bytes }
    }
}

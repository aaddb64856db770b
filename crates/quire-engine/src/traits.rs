// SPDX-License-Identifier: MIT
//
// Collaborator traits — the engine's view of the document codec, the raster
// renderer, the OCR recognizer, and the remote office-conversion service.
//
// The engine never touches a container format or a pixel directly; everything
// format-specific lives behind these traits so the collection and assembly
// logic can be exercised against lightweight test doubles.

use quire_core::error::Result;
use quire_core::types::{ExportKind, InputKind, Rotation};

/// Document container codec.
///
/// `Document` is an opaque in-memory handle; `PageHandle` identifies one page
/// inside a document the codec itself produced (e.g. an object id). Copying a
/// page appends it to the target document and returns the handle of the copy.
pub trait PageCodec {
    type Document;
    type PageHandle: Copy;

    /// Parse raw bytes into a document handle.
    ///
    /// Fails with [`quire_core::QuireError::CorruptInput`] when the bytes are
    /// not a readable document; this surfaces before any page reference can
    /// be created from the source.
    fn load(&self, bytes: &[u8]) -> Result<Self::Document>;

    /// Number of pages in the document.
    fn page_count(&self, doc: &Self::Document) -> usize;

    /// Create a new empty document.
    fn create_empty(&self) -> Self::Document;

    /// Copy page `index` (0-based) of `source` into `target`, appending it as
    /// the last page. Returns a handle to the copy inside `target`.
    fn copy_page(
        &self,
        source: &Self::Document,
        index: usize,
        target: &mut Self::Document,
    ) -> Result<Self::PageHandle>;

    /// The rotation a page already carries in its own metadata, in degrees.
    fn base_rotation(&self, doc: &Self::Document, page: Self::PageHandle) -> Result<i32>;

    /// Overwrite the stored rotation of a page, in degrees (normalised by the
    /// codec as needed).
    fn set_rotation(
        &self,
        doc: &mut Self::Document,
        page: Self::PageHandle,
        degrees: i32,
    ) -> Result<()>;

    /// Serialise a document to bytes.
    fn serialize(&self, doc: &Self::Document) -> Result<Vec<u8>>;
}

/// Raster renderer for page previews.
///
/// Each render call is keyed to an immutable `(index, rotation)` snapshot;
/// callers are responsible for discarding results whose rotation no longer
/// matches by the time they complete (see [`crate::ThumbnailCache::accept`]).
pub trait PageRenderer<D> {
    type Bitmap;

    /// Render page `index` of `doc` at the given scale and rotation.
    fn render(&self, doc: &D, index: usize, scale: f32, rotation: Rotation)
    -> Result<Self::Bitmap>;
}

/// OCR text recognizer.
///
/// `on_progress` is invoked with values in 0..=100 as recognition proceeds.
pub trait TextRecognizer<B> {
    fn recognize(&self, bitmap: &B, on_progress: &mut dyn FnMut(u8)) -> Result<String>;
}

/// Remote office-format conversion service.
///
/// Only non-native inputs (Word, spreadsheets, presentations) go through
/// `convert`; the collection model itself only ever sees documents already
/// in the native page-container format. `export` runs in the opposite
/// direction, turning a native document back into an office format.
pub trait OfficeConverter {
    fn convert(
        &self,
        bytes: Vec<u8>,
        kind: InputKind,
    ) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;

    fn export(
        &self,
        bytes: Vec<u8>,
        kind: ExportKind,
    ) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

// SPDX-License-Identifier: MIT
//
// quire-document — The PDF container codec and single-pass document
// transforms for Quire.
//
// The codec implements the engine's `PageCodec` trait over `lopdf`, so the
// collection model never touches PDF structure directly. The transforms
// (watermark, protect/unlock, flatten, image composition) are whole-document
// passes that take serialised input and return serialised output. Office
// formats are converted by a remote service reached through `reqwest`.

pub mod convert;
pub mod pdf;

#[cfg(feature = "ocr")]
pub mod ocr;

pub use convert::HttpOfficeConverter;
pub use pdf::codec::PdfCodec;
pub use pdf::compose::ImageComposer;
pub use pdf::metadata::DocumentMetadata;
pub use pdf::watermark::WatermarkOptions;

#[cfg(feature = "ocr")]
pub use ocr::{OcrConfig, OcrEngine};

#[cfg(test)]
pub(crate) mod testing;

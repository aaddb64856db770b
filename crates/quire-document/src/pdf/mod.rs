// SPDX-License-Identifier: MIT
//
// PDF module — the container codec plus single-pass transforms over
// serialised documents.

pub mod codec;
pub mod compose;
pub mod flatten;
pub mod metadata;
pub mod security;
pub mod watermark;

pub use codec::PdfCodec;
pub use compose::ImageComposer;
pub use metadata::DocumentMetadata;

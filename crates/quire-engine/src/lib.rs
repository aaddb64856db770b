// SPDX-License-Identifier: MIT
//
// quire-engine — The page-collection model and reorder/transform engine.
//
// The engine maintains an ordered, identity-addressed collection of page
// references drawn from any number of loaded source documents, and knows how
// to materialise that collection into a fresh output document. The document
// container codec, the raster renderer, the OCR recognizer, and the remote
// conversion service are all external collaborators consumed through the
// traits in [`traits`].

pub mod assembly;
pub mod collection;
pub mod reference;
pub mod session;
pub mod split;
pub mod thumbnail;
pub mod traits;

pub use assembly::{AssemblyEngine, SourceDocument, SourceRegistry};
pub use collection::PageCollection;
pub use reference::PageReference;
pub use session::{Session, SharedSession};
pub use split::SplitPlan;
pub use thumbnail::ThumbnailCache;
pub use traits::{OfficeConverter, PageCodec, PageRenderer, TextRecognizer};

#[cfg(test)]
pub(crate) mod testing;

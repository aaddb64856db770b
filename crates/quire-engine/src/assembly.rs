// SPDX-License-Identifier: MIT
//
// Source registry and assembly engine — materialising a page collection into
// a fresh output document.

use std::collections::HashMap;

use quire_core::error::{QuireError, Result};
use quire_core::types::{Rotation, SourceId};
use tracing::{debug, info, instrument};

use crate::collection::PageCollection;
use crate::traits::PageCodec;

/// A loaded source document: an opaque codec handle plus the metadata the
/// engine needs. Read-only after load; owned by the registry for the lifetime
/// of the session.
pub struct SourceDocument<D> {
    id: SourceId,
    doc: D,
    page_count: usize,
    name: String,
    fingerprint: String,
}

impl<D> SourceDocument<D> {
    /// Wrap an already-loaded codec document. Mints a fresh [`SourceId`].
    pub fn new(doc: D, page_count: usize, name: impl Into<String>, fingerprint: String) -> Self {
        Self {
            id: SourceId::new(),
            doc,
            page_count,
            name: name.into(),
            fingerprint,
        }
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn doc(&self) -> &D {
        &self.doc
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// SHA-256 hex fingerprint of the original bytes.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Owns every loaded source for one editing session, keyed by [`SourceId`].
///
/// Releasing a source while page references into it still exist is legal;
/// a subsequent assembly fails with [`QuireError::StaleSource`] and leaves
/// the collection untouched so the caller can reload and retry.
pub struct SourceRegistry<D> {
    sources: HashMap<SourceId, SourceDocument<D>>,
}

impl<D> Default for SourceRegistry<D> {
    fn default() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }
}

impl<D> SourceRegistry<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a loaded source, returning its identity.
    pub fn register(&mut self, source: SourceDocument<D>) -> SourceId {
        let id = source.id();
        debug!(source = %id, pages = source.page_count(), name = source.name(), "source registered");
        self.sources.insert(id, source);
        id
    }

    pub fn get(&self, id: SourceId) -> Option<&SourceDocument<D>> {
        self.sources.get(&id)
    }

    pub fn contains(&self, id: SourceId) -> bool {
        self.sources.contains_key(&id)
    }

    /// Drop a source handle. Returns whether it was present.
    pub fn release(&mut self, id: SourceId) -> bool {
        let released = self.sources.remove(&id).is_some();
        if released {
            debug!(source = %id, "source released");
        }
        released
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Walks an ordered page collection and copies each referenced page, with its
/// stored rotation, into a fresh output document.
pub struct AssemblyEngine<'a, C: PageCodec> {
    codec: &'a C,
    sources: &'a SourceRegistry<C::Document>,
}

impl<'a, C: PageCodec> AssemblyEngine<'a, C> {
    pub fn new(codec: &'a C, sources: &'a SourceRegistry<C::Document>) -> Self {
        Self { codec, sources }
    }

    /// Materialise `collection` into a new output document.
    ///
    /// All-or-nothing: every reference is checked against the registry before
    /// any page is copied, so a stale reference aborts the attempt without a
    /// partial output and without touching the collection. An empty
    /// collection is legal and yields a zero-page document.
    #[instrument(skip_all, fields(pages = collection.len()))]
    pub fn assemble(&self, collection: &PageCollection) -> Result<C::Document> {
        // Pre-flight: fail on the first stale reference before copying.
        for reference in collection.ordered() {
            if !self.sources.contains(reference.source()) {
                return Err(QuireError::StaleSource(reference.source()));
            }
        }

        let mut output = self.codec.create_empty();

        for reference in collection.ordered() {
            let source = self
                .sources
                .get(reference.source())
                .ok_or(QuireError::StaleSource(reference.source()))?;

            if reference.source_index() >= source.page_count() {
                return Err(QuireError::PdfError(format!(
                    "page index {} out of range for source {} ({} pages)",
                    reference.source_index(),
                    source.name(),
                    source.page_count()
                )));
            }

            let copied =
                self.codec
                    .copy_page(source.doc(), reference.source_index(), &mut output)?;

            // The stored rotation composes with whatever the copied page
            // already carries; it never replaces it.
            if reference.rotation() != Rotation::R0 {
                let base = self.codec.base_rotation(&output, copied)?;
                let final_rotation =
                    (base + reference.rotation().degrees()).rem_euclid(360);
                self.codec.set_rotation(&mut output, copied, final_rotation)?;
            }
        }

        info!(pages = collection.len(), "assembly complete");
        Ok(output)
    }

    /// Assemble and serialise in one step.
    pub fn assemble_bytes(&self, collection: &PageCollection) -> Result<Vec<u8>> {
        let output = self.assemble(collection)?;
        self.codec.serialize(&output)
    }
}

// SPDX-License-Identifier: MIT
//
// Editing session — ties the source registry, the page collection, and the
// thumbnail cache together, and enforces the session-level concurrency rules:
// at most one assembly in flight, and no completions after discard.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use quire_core::error::{QuireError, Result};
use quire_core::fingerprint::hash_bytes;
use quire_core::types::{PageId, SourceId};
use tracing::{debug, info, instrument};

use crate::assembly::{AssemblyEngine, SourceDocument, SourceRegistry};
use crate::collection::PageCollection;
use crate::split::SplitPlan;
use crate::thumbnail::ThumbnailCache;
use crate::traits::{PageCodec, PageRenderer};

/// One editing session: loaded sources, the working page collection, and the
/// preview cache.
///
/// All methods are synchronous — the codec is CPU-bound, not I/O-bound. In an
/// async context use [`SharedSession`], which serialises access and
/// assemblies behind `tokio` mutexes.
pub struct Session<C: PageCodec, B = ()> {
    codec: C,
    sources: SourceRegistry<C::Document>,
    collection: PageCollection,
    thumbnails: ThumbnailCache<B>,
}

impl<C: PageCodec, B> Session<C, B> {
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            sources: SourceRegistry::new(),
            collection: PageCollection::new(),
            thumbnails: ThumbnailCache::new(),
        }
    }

    /// Session with a soft cap on cached thumbnails.
    pub fn with_thumbnail_capacity(codec: C, max_entries: usize) -> Self {
        Self {
            thumbnails: ThumbnailCache::with_capacity(max_entries),
            ..Self::new(codec)
        }
    }

    // -- Sources --------------------------------------------------------------

    /// Load a source document from bytes and append one page reference per
    /// page to the collection.
    ///
    /// A corrupt source surfaces here, before any reference exists, so the
    /// collection never contains references into an unreadable document.
    /// Already-loaded sources are unaffected by the failure.
    #[instrument(skip_all, fields(name, bytes_len = bytes.len()))]
    pub fn load_source(&mut self, bytes: &[u8], name: &str) -> Result<SourceId> {
        let doc = self.codec.load(bytes)?;
        let page_count = self.codec.page_count(&doc);
        let fingerprint = hash_bytes(bytes);

        let source_id = self
            .sources
            .register(SourceDocument::new(doc, page_count, name, fingerprint));

        for index in 0..page_count {
            // Fresh identities cannot collide; a failure here is an
            // identity-minting bug and is propagated as fatal.
            self.collection
                .append(crate::reference::PageReference::new(source_id, index))?;
        }

        info!(source = %source_id, pages = page_count, "source loaded");
        Ok(source_id)
    }

    /// Release a source handle. References into it stay in the collection and
    /// make later assembly fail with [`QuireError::StaleSource`] until the
    /// caller removes them or reloads the source.
    pub fn release_source(&mut self, id: SourceId) -> bool {
        self.sources.release(id)
    }

    pub fn sources(&self) -> &SourceRegistry<C::Document> {
        &self.sources
    }

    // -- Collection mutation ---------------------------------------------------

    pub fn remove_page(&mut self, id: PageId) -> Result<()> {
        self.collection.remove(id)?;
        self.thumbnails.invalidate(id);
        Ok(())
    }

    pub fn move_page(&mut self, id: PageId, new_position: usize) -> Result<()> {
        self.collection.move_to(id, new_position)
    }

    pub fn rotate_page(&mut self, id: PageId, delta: i32) -> Result<()> {
        self.collection.rotate(id, delta)?;
        Ok(())
    }

    pub fn collection(&self) -> &PageCollection {
        &self.collection
    }

    // -- Assembly & split ------------------------------------------------------

    /// Assemble the current collection into serialised output bytes.
    pub fn assemble_bytes(&self) -> Result<Vec<u8>> {
        AssemblyEngine::new(&self.codec, &self.sources).assemble_bytes(&self.collection)
    }

    /// Plan a per-page split of one loaded source.
    pub fn split(&self, source: SourceId) -> Result<SplitPlan<'_, C>> {
        SplitPlan::new(&self.codec, &self.sources, source)
    }

    // -- Thumbnails ------------------------------------------------------------

    /// Fetch (or render) the preview for one page identity.
    pub fn thumbnail<R>(&mut self, id: PageId, renderer: &R, scale: f32) -> Result<Arc<B>>
    where
        R: PageRenderer<C::Document, Bitmap = B>,
    {
        let reference = *self
            .collection
            .get(id)
            .ok_or(QuireError::PageNotFound(id))?;
        let source = self
            .sources
            .get(reference.source())
            .ok_or(QuireError::StaleSource(reference.source()))?;

        self.thumbnails.get_or_render(&reference, || {
            renderer.render(
                source.doc(),
                reference.source_index(),
                scale,
                reference.rotation(),
            )
        })
    }

    /// Completion path for an out-of-band render; stale results (rotation
    /// changed or page removed since the render was keyed) are discarded.
    pub fn accept_thumbnail(
        &mut self,
        id: PageId,
        rendered_at: quire_core::types::Rotation,
        bitmap: B,
    ) -> bool {
        let current = self.collection.get(id).map(|r| r.rotation());
        self.thumbnails.accept(id, rendered_at, current, bitmap)
    }

    pub fn thumbnails(&self) -> &ThumbnailCache<B> {
        &self.thumbnails
    }
}

/// Cloneable async wrapper around a [`Session`].
///
/// Mutations and assemblies share one session mutex, so a mutation can never
/// interleave with an in-flight assembly's walk of the collection. A separate
/// assembly gate guarantees at most one logical assembly at a time — a second
/// request queues on the gate rather than running concurrently. `discard`
/// flips a flag that turns every later completion into a no-op, so in-flight
/// work for an abandoned session cannot corrupt or resurrect state.
pub struct SharedSession<C: PageCodec, B = ()> {
    inner: Arc<tokio::sync::Mutex<Session<C, B>>>,
    assembly_gate: Arc<tokio::sync::Mutex<()>>,
    discarded: Arc<AtomicBool>,
}

impl<C: PageCodec, B> Clone for SharedSession<C, B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            assembly_gate: Arc::clone(&self.assembly_gate),
            discarded: Arc::clone(&self.discarded),
        }
    }
}

impl<C: PageCodec, B> SharedSession<C, B> {
    pub fn new(session: Session<C, B>) -> Self {
        Self {
            inner: Arc::new(tokio::sync::Mutex::new(session)),
            assembly_gate: Arc::new(tokio::sync::Mutex::new(())),
            discarded: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn load_source(&self, bytes: &[u8], name: &str) -> Result<SourceId> {
        self.inner.lock().await.load_source(bytes, name)
    }

    pub async fn remove_page(&self, id: PageId) -> Result<()> {
        self.inner.lock().await.remove_page(id)
    }

    pub async fn move_page(&self, id: PageId, new_position: usize) -> Result<()> {
        self.inner.lock().await.move_page(id, new_position)
    }

    pub async fn rotate_page(&self, id: PageId, delta: i32) -> Result<()> {
        self.inner.lock().await.rotate_page(id, delta)
    }

    pub async fn release_source(&self, id: SourceId) -> bool {
        self.inner.lock().await.release_source(id)
    }

    pub async fn page_ids(&self) -> Vec<PageId> {
        self.inner.lock().await.collection().ids()
    }

    /// Assemble the current collection.
    ///
    /// Returns `Ok(None)` when the session was discarded before or during the
    /// attempt — the completion is a no-op, not an error. At most one
    /// assembly runs at a time; concurrent callers queue on the gate in
    /// arrival order.
    pub async fn assemble(&self) -> Result<Option<Vec<u8>>> {
        let _gate = self.assembly_gate.lock().await;
        if self.is_discarded() {
            debug!("assembly skipped: session discarded");
            return Ok(None);
        }

        // The codec walk is synchronous and runs under the session lock, so
        // mutations queue behind it rather than interleaving with it.
        let session = self.inner.lock().await;
        let bytes = session.assemble_bytes()?;
        drop(session);

        if self.is_discarded() {
            debug!("assembly result dropped: session discarded");
            return Ok(None);
        }
        Ok(Some(bytes))
    }

    /// Abandon the session. In-flight operations complete harmlessly; their
    /// results are dropped.
    pub fn discard(&self) {
        self.discarded.store(true, Ordering::SeqCst);
        info!("session discarded");
    }

    pub fn is_discarded(&self) -> bool {
        self.discarded.load(Ordering::SeqCst)
    }

    /// Completion path for an out-of-band render. No-op after discard.
    pub async fn accept_thumbnail(
        &self,
        id: PageId,
        rendered_at: quire_core::types::Rotation,
        bitmap: B,
    ) -> bool {
        if self.is_discarded() {
            return false;
        }
        self.inner
            .lock()
            .await
            .accept_thumbnail(id, rendered_at, bitmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingRenderer, MockCodec};
    use quire_core::types::Rotation;

    #[test]
    fn load_source_registers_pages_in_order() {
        let mut session: Session<MockCodec, String> = Session::new(MockCodec);
        let a = session.load_source(b"A0,A1,A2", "a.pdf").expect("load a");
        session.load_source(b"B0,B1", "b.pdf").expect("load b");

        assert_eq!(session.collection().len(), 5);
        assert_eq!(session.sources().len(), 2);

        let bytes = session.assemble_bytes().expect("assemble");
        assert_eq!(bytes, b"A0,A1,A2,B0,B1");

        let from_a = session
            .collection()
            .ordered()
            .filter(|r| r.source() == a)
            .count();
        assert_eq!(from_a, 3);
    }

    #[test]
    fn corrupt_source_leaves_session_untouched() {
        let mut session: Session<MockCodec, String> = Session::new(MockCodec);
        session.load_source(b"A0", "a.pdf").expect("load a");

        let err = session.load_source(b"", "bad.pdf").expect_err("corrupt");
        assert!(matches!(err, QuireError::CorruptInput(_)));
        assert_eq!(session.collection().len(), 1);
        assert_eq!(session.sources().len(), 1);
    }

    #[test]
    fn remove_page_invalidates_thumbnail() {
        let mut session: Session<MockCodec, String> = Session::new(MockCodec);
        session.load_source(b"A0,A1", "a.pdf").expect("load");
        let ids = session.collection().ids();

        let renderer = CountingRenderer::default();
        session
            .thumbnail(ids[0], &renderer, 0.3)
            .expect("thumbnail");
        assert!(session.thumbnails().contains(ids[0]));

        session.remove_page(ids[0]).expect("remove");
        assert!(!session.thumbnails().contains(ids[0]));
    }

    #[test]
    fn assemble_after_release_fails_and_preserves_collection() {
        let mut session: Session<MockCodec, String> = Session::new(MockCodec);
        let source = session.load_source(b"A0,A1", "a.pdf").expect("load");

        assert!(session.release_source(source));
        let err = session.assemble_bytes().expect_err("stale");
        assert!(matches!(err, QuireError::StaleSource(id) if id == source));
        assert_eq!(session.collection().len(), 2);
    }

    #[test]
    fn reorder_and_rotate_flow_through_assembly() {
        let mut session: Session<MockCodec, String> = Session::new(MockCodec);
        session.load_source(b"A0,A1,A2", "a.pdf").expect("load");
        let ids = session.collection().ids();

        session.move_page(ids[2], 0).expect("move");
        session.remove_page(ids[1]).expect("remove");
        session.rotate_page(ids[0], 90).expect("rotate");

        let bytes = session.assemble_bytes().expect("assemble");
        assert_eq!(bytes, b"A2,A0@90");
    }

    #[tokio::test]
    async fn shared_session_assembles() {
        let shared: SharedSession<MockCodec, String> =
            SharedSession::new(Session::new(MockCodec));
        shared.load_source(b"A0,A1", "a.pdf").await.expect("load");

        let bytes = shared.assemble().await.expect("assemble").expect("live");
        assert_eq!(bytes, b"A0,A1");
    }

    #[tokio::test]
    async fn discarded_session_completions_are_noops() {
        let shared: SharedSession<MockCodec, String> =
            SharedSession::new(Session::new(MockCodec));
        shared.load_source(b"A0", "a.pdf").await.expect("load");
        let ids = shared.page_ids().await;

        shared.discard();

        let result = shared.assemble().await.expect("no error");
        assert!(result.is_none(), "assembly after discard must be a no-op");

        let accepted = shared
            .accept_thumbnail(ids[0], Rotation::R0, "late render".into())
            .await;
        assert!(!accepted, "thumbnail completion after discard must be dropped");
    }

    #[tokio::test]
    async fn concurrent_assemblies_serialise() {
        let shared: SharedSession<MockCodec, String> =
            SharedSession::new(Session::new(MockCodec));
        shared.load_source(b"A0,A1,A2", "a.pdf").await.expect("load");

        // Both complete against the same (unmutated) collection, so both see
        // the same output; the gate guarantees they never interleave.
        let (first, second) = tokio::join!(shared.assemble(), shared.assemble());
        assert_eq!(first.expect("first").expect("live"), b"A0,A1,A2");
        assert_eq!(second.expect("second").expect("live"), b"A0,A1,A2");
    }
}

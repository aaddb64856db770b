// SPDX-License-Identifier: MIT
//
// Thumbnail cache — identity-keyed preview bitmaps.
//
// An entry is valid only while the rotation it was rendered at equals the
// reference's current rotation; any mismatch forces exactly one re-render.
// Sizing is a soft cap: beyond `max_entries` the oldest entries are trimmed.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use quire_core::error::Result;
use quire_core::types::{PageId, Rotation};
use tracing::{debug, trace};

use crate::reference::PageReference;

struct CacheEntry<B> {
    rotation: Rotation,
    bitmap: Arc<B>,
}

/// Cache of rendered page previews, keyed by stable page identity.
pub struct ThumbnailCache<B> {
    entries: HashMap<PageId, CacheEntry<B>>,
    /// Insertion order, oldest first, for cap-based trimming.
    order: VecDeque<PageId>,
    max_entries: Option<usize>,
}

impl<B> Default for ThumbnailCache<B> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_entries: None,
        }
    }
}

impl<B> ThumbnailCache<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache with a soft entry cap; oldest entries are trimmed beyond it.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries),
            ..Self::default()
        }
    }

    /// Return the cached bitmap for `reference`, rendering on miss.
    ///
    /// A hit requires the stored rotation to equal the reference's current
    /// rotation; a rotation mismatch behaves exactly like a miss and replaces
    /// the stale entry.
    pub fn get_or_render(
        &mut self,
        reference: &PageReference,
        render: impl FnOnce() -> Result<B>,
    ) -> Result<Arc<B>> {
        if let Some(entry) = self.entries.get(&reference.id())
            && entry.rotation == reference.rotation()
        {
            trace!(id = %reference.id(), "thumbnail cache hit");
            return Ok(Arc::clone(&entry.bitmap));
        }

        debug!(id = %reference.id(), rotation = reference.rotation().degrees(), "thumbnail render");
        let bitmap = Arc::new(render()?);
        self.insert(reference.id(), reference.rotation(), Arc::clone(&bitmap));
        Ok(bitmap)
    }

    /// Completion path for renders performed out-of-band (e.g. a batch render
    /// overlapping collection mutation).
    ///
    /// `current` is the reference's rotation right now, or `None` if the
    /// reference has been removed. The result is cached only when the
    /// reference still exists and its rotation is unchanged since the render
    /// was keyed; a stale result is discarded rather than cached. Returns
    /// whether the bitmap was accepted.
    pub fn accept(
        &mut self,
        id: PageId,
        rendered_at: Rotation,
        current: Option<Rotation>,
        bitmap: B,
    ) -> bool {
        match current {
            Some(rotation) if rotation == rendered_at => {
                self.insert(id, rendered_at, Arc::new(bitmap));
                true
            }
            _ => {
                debug!(id = %id, "discarding stale thumbnail render");
                false
            }
        }
    }

    /// Drop the entry for a removed identity.
    pub fn invalidate(&mut self, id: PageId) {
        if self.entries.remove(&id).is_some() {
            self.order.retain(|entry| *entry != id);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: PageId) -> bool {
        self.entries.contains_key(&id)
    }

    fn insert(&mut self, id: PageId, rotation: Rotation, bitmap: Arc<B>) {
        if self.entries.insert(id, CacheEntry { rotation, bitmap }).is_none() {
            self.order.push_back(id);
        }
        if let Some(cap) = self.max_entries {
            while self.entries.len() > cap {
                match self.order.pop_front() {
                    Some(oldest) => {
                        self.entries.remove(&oldest);
                    }
                    None => break,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingRenderer, MockCodec, load_source};
    use crate::traits::PageRenderer;
    use quire_core::types::{PageId, SourceId};

    fn render_through(
        cache: &mut ThumbnailCache<String>,
        reference: &PageReference,
        renderer: &CountingRenderer,
        doc: &crate::testing::MockDoc,
    ) -> Arc<String> {
        cache
            .get_or_render(reference, || {
                renderer.render(doc, reference.source_index(), 0.3, reference.rotation())
            })
            .expect("render")
    }

    #[test]
    fn rotation_change_forces_exactly_one_rerender() {
        let codec = MockCodec;
        let source = load_source(&codec, b"P0,P1", "doc.pdf");
        let renderer = CountingRenderer::default();
        let mut cache = ThumbnailCache::new();

        let reference = PageReference::new(source.id(), 0);

        // First request renders.
        render_through(&mut cache, &reference, &renderer, source.doc());
        assert_eq!(renderer.renders.get(), 1);

        // Repeat request with unchanged rotation hits the cache.
        render_through(&mut cache, &reference, &renderer, source.doc());
        assert_eq!(renderer.renders.get(), 1);

        // Rotate, request again: exactly one re-render, then hits again.
        let rotated = reference.with_rotation(90);
        let bitmap = render_through(&mut cache, &rotated, &renderer, source.doc());
        assert_eq!(renderer.renders.get(), 2);
        assert_eq!(bitmap.as_str(), "P0/90");

        render_through(&mut cache, &rotated, &renderer, source.doc());
        assert_eq!(renderer.renders.get(), 2);
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut cache: ThumbnailCache<String> = ThumbnailCache::new();
        let reference = PageReference::new(SourceId::new(), 0);

        // Render was keyed at R0 but the page is now at R90.
        let accepted = cache.accept(
            reference.id(),
            Rotation::R0,
            Some(Rotation::R90),
            "stale".into(),
        );
        assert!(!accepted);
        assert!(cache.is_empty());

        // Render for a removed reference is likewise dropped.
        let accepted = cache.accept(reference.id(), Rotation::R0, None, "orphan".into());
        assert!(!accepted);

        // Matching rotation is cached.
        let accepted = cache.accept(
            reference.id(),
            Rotation::R90,
            Some(Rotation::R90),
            "fresh".into(),
        );
        assert!(accepted);
        assert!(cache.contains(reference.id()));
    }

    #[test]
    fn invalidate_removes_entry() {
        let mut cache: ThumbnailCache<String> = ThumbnailCache::new();
        let reference = PageReference::new(SourceId::new(), 0);
        cache.accept(
            reference.id(),
            Rotation::R0,
            Some(Rotation::R0),
            "bitmap".into(),
        );

        cache.invalidate(reference.id());
        assert!(!cache.contains(reference.id()));
        assert!(cache.is_empty());
    }

    #[test]
    fn capacity_trims_oldest_first() {
        let mut cache: ThumbnailCache<String> = ThumbnailCache::with_capacity(2);
        let ids: Vec<_> = (0..3).map(|_| PageId::new()).collect();

        for (i, id) in ids.iter().enumerate() {
            cache.accept(*id, Rotation::R0, Some(Rotation::R0), format!("b{i}"));
        }

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(ids[0]), "oldest entry should be trimmed");
        assert!(cache.contains(ids[1]));
        assert!(cache.contains(ids[2]));
    }
}

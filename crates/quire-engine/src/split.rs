// SPDX-License-Identifier: MIT
//
// Split planner — one single-page output document per page of a source.
//
// A degenerate case of assembly: each step builds a one-entry collection and
// assembles it. The plan is a lazy iterator because each step serialises a
// full document; for large inputs the caller streams the outputs instead of
// materialising them all.

use quire_core::error::{QuireError, Result};
use quire_core::types::SourceId;
use tracing::debug;

use crate::assembly::{AssemblyEngine, SourceRegistry};
use crate::collection::PageCollection;
use crate::reference::PageReference;
use crate::traits::PageCodec;

/// Lazy, finite, non-restartable sequence of single-page output documents.
pub struct SplitPlan<'a, C: PageCodec> {
    engine: AssemblyEngine<'a, C>,
    source: SourceId,
    next_index: usize,
    total: usize,
}

impl<'a, C: PageCodec> SplitPlan<'a, C> {
    /// Plan a split of `source`. Fails immediately if the source is not
    /// registered.
    pub fn new(
        codec: &'a C,
        sources: &'a SourceRegistry<C::Document>,
        source: SourceId,
    ) -> Result<Self> {
        let total = sources
            .get(source)
            .ok_or(QuireError::StaleSource(source))?
            .page_count();
        debug!(source = %source, pages = total, "split planned");
        Ok(Self {
            engine: AssemblyEngine::new(codec, sources),
            source,
            next_index: 0,
            total,
        })
    }

    /// Pages remaining in the plan.
    pub fn remaining(&self) -> usize {
        self.total - self.next_index
    }
}

impl<C: PageCodec> Iterator for SplitPlan<'_, C> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.total {
            return None;
        }
        let index = self.next_index;
        self.next_index += 1;

        let mut single = PageCollection::new();
        if let Err(err) = single.append(PageReference::new(self.source, index)) {
            return Some(Err(err));
        }
        Some(self.engine.assemble_bytes(&single))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

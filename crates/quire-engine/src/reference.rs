// SPDX-License-Identifier: MIT
//
// Page references — provenance plus presentation transform for one page.

use quire_core::types::{PageId, Rotation, SourceId};

/// An immutable record of one page's provenance plus its mutable presentation
/// rotation.
///
/// `id` is minted once at construction and never recomputed; it is the only
/// stable handle callers (UI, thumbnail cache) may retain across reorders.
/// `source_index` is immutable; `rotation` is the only field that changes
/// over the reference's lifetime, and it is stored — never applied
/// destructively to the source page. It is replayed at assembly time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageReference {
    id: PageId,
    source: SourceId,
    source_index: usize,
    rotation: Rotation,
}

impl PageReference {
    /// Create a reference to page `source_index` (0-based) of `source`, with
    /// a freshly minted identity and no rotation.
    ///
    /// The caller guarantees `source_index < page_count` of the source; the
    /// session enforces this at registration time.
    pub fn new(source: SourceId, source_index: usize) -> Self {
        Self {
            id: PageId::new(),
            source,
            source_index,
            rotation: Rotation::R0,
        }
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn source_index(&self) -> usize {
        self.source_index
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Return the same reference rotated by `delta` degrees (a multiple of
    /// 90, typically 90, -90, or 180). Identity and provenance are unchanged.
    pub fn with_rotation(self, delta: i32) -> Self {
        Self {
            rotation: self.rotation.rotated_by(delta),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_rotation_keeps_identity_and_provenance() {
        let source = SourceId::new();
        let original = PageReference::new(source, 3);
        let rotated = original.with_rotation(90);

        assert_eq!(rotated.id(), original.id());
        assert_eq!(rotated.source(), source);
        assert_eq!(rotated.source_index(), 3);
        assert_eq!(rotated.rotation(), Rotation::R90);
    }

    #[test]
    fn negative_delta_wraps() {
        let r = PageReference::new(SourceId::new(), 0).with_rotation(-90);
        assert_eq!(r.rotation(), Rotation::R270);
    }

    #[test]
    fn fresh_references_have_distinct_identities() {
        let source = SourceId::new();
        let a = PageReference::new(source, 0);
        let b = PageReference::new(source, 0);
        assert_ne!(a.id(), b.id());
    }
}

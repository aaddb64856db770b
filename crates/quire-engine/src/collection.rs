// SPDX-License-Identifier: MIT
//
// Page collection — the ordered, identity-addressed sequence of page
// references that defines the output document.
//
// All mutation is addressed by stable identity, never by positional index:
// positions are invalidated by every move or delete, identities never are.

use quire_core::error::{QuireError, Result};
use quire_core::types::{PageId, Rotation};
use tracing::{debug, instrument, warn};

use crate::reference::PageReference;

/// An ordered sequence of [`PageReference`] with unique identities.
///
/// Order is significant — it defines the page order of the assembled output.
/// Created empty per editing session and discarded with it.
#[derive(Debug, Default, Clone)]
pub struct PageCollection {
    entries: Vec<PageReference>,
}

impl PageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reference at the end.
    ///
    /// Identities are minted fresh at construction, so a duplicate here means
    /// an identity-minting bug; it is rejected and logged rather than
    /// silently accepted.
    pub fn append(&mut self, reference: PageReference) -> Result<()> {
        if self.entries.iter().any(|e| e.id() == reference.id()) {
            warn!(id = %reference.id(), "rejected duplicate page identity");
            return Err(QuireError::DuplicateIdentity(reference.id()));
        }
        self.entries.push(reference);
        Ok(())
    }

    /// Remove the entry with the given identity, preserving the order of the
    /// remaining entries. Removing the last entry leaves a valid, empty
    /// collection.
    #[instrument(skip(self), fields(id = %id))]
    pub fn remove(&mut self, id: PageId) -> Result<PageReference> {
        let position = self.position_of(id).ok_or(QuireError::PageNotFound(id))?;
        let removed = self.entries.remove(position);
        debug!(position, remaining = self.entries.len(), "page removed");
        Ok(removed)
    }

    /// Relocate the entry with the given identity to `new_position`, clamped
    /// to `[0, len - 1]`. All other entries shift accordingly. Moving an
    /// entry to its own current position is a no-op.
    #[instrument(skip(self), fields(id = %id, new_position))]
    pub fn move_to(&mut self, id: PageId, new_position: usize) -> Result<()> {
        let from = self.position_of(id).ok_or(QuireError::PageNotFound(id))?;
        let to = new_position.min(self.entries.len().saturating_sub(1));
        if from == to {
            return Ok(());
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        debug!(from, to, "page moved");
        Ok(())
    }

    /// Rotate the entry with the given identity by `delta` degrees (a
    /// multiple of 90) in place.
    pub fn rotate(&mut self, id: PageId, delta: i32) -> Result<Rotation> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(QuireError::PageNotFound(id))?;
        *entry = entry.with_rotation(delta);
        Ok(entry.rotation())
    }

    /// The current sequence as a live, read-only view.
    ///
    /// The view reflects the collection at iteration time; callers must not
    /// assume a previously obtained snapshot stays valid across mutation.
    pub fn ordered(&self) -> impl Iterator<Item = &PageReference> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a reference by identity.
    pub fn get(&self, id: PageId) -> Option<&PageReference> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Current position of an identity, if present.
    pub fn position_of(&self, id: PageId) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    /// Identities in current order (handy for callers driving the
    /// collection from positional input, e.g. the CLI).
    pub fn ids(&self) -> Vec<PageId> {
        self.entries.iter().map(|e| e.id()).collect()
    }
}

// SPDX-License-Identifier: MIT
//
// PDF container codec — implements the engine's `PageCodec` over `lopdf`.
//
// Pages are copied between documents by deep-cloning the page object and
// everything it transitively references, skipping the /Parent back-reference
// (patched after the graft). Source documents are never mutated; rotation is
// written only on pages of the output document.

use std::collections::HashMap;
use std::path::Path;

use lopdf::{Document, Object, ObjectId, dictionary};
use quire_core::error::{QuireError, Result};
use quire_engine::PageCodec;
use tracing::{debug, instrument, warn};

/// The production codec. Stateless; one instance serves any number of
/// documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfCodec;

impl PdfCodec {
    pub fn new() -> Self {
        Self
    }

    /// Open a document from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(&self, path: impl AsRef<Path>) -> Result<Document> {
        let bytes = std::fs::read(path.as_ref())?;
        self.load(&bytes)
    }

    /// Load an encrypted document, decrypting it with `password`.
    ///
    /// A wrong password surfaces as [`QuireError::Decryption`]. Unencrypted
    /// input is accepted as-is.
    #[instrument(skip_all, fields(bytes_len = bytes.len()))]
    pub fn load_with_password(&self, bytes: &[u8], password: &str) -> Result<Document> {
        let mut doc = Document::load_mem(bytes)
            .map_err(|err| QuireError::CorruptInput(format!("failed to parse PDF: {err}")))?;
        if doc.is_encrypted() {
            doc.decrypt(password)
                .map_err(|err| QuireError::Decryption(format!("cannot decrypt PDF: {err}")))?;
        }
        Ok(doc)
    }

    /// Object id of the 1-indexed page `number`, if present.
    pub fn page_id(&self, doc: &Document, number: u32) -> Option<ObjectId> {
        doc.get_pages().get(&number).copied()
    }
}

impl PageCodec for PdfCodec {
    type Document = Document;
    type PageHandle = ObjectId;

    fn load(&self, bytes: &[u8]) -> Result<Document> {
        let doc = Document::load_mem(bytes)
            .map_err(|err| QuireError::CorruptInput(format!("failed to parse PDF: {err}")))?;
        if doc.is_encrypted() {
            // The caller must decrypt explicitly via `load_with_password`;
            // silently accepting an encrypted document would make every later
            // page copy fail with opaque stream errors.
            return Err(QuireError::Decryption(
                "document is password-protected".to_string(),
            ));
        }
        Ok(doc)
    }

    fn page_count(&self, doc: &Document) -> usize {
        doc.get_pages().len()
    }

    fn create_empty(&self) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Object::Array(Vec::new()),
            "Count" => 0,
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc
    }

    fn copy_page(
        &self,
        source: &Document,
        index: usize,
        target: &mut Document,
    ) -> Result<ObjectId> {
        let pages = source.get_pages();
        // lopdf keys pages by 1-indexed page number.
        let number = u32::try_from(index + 1)
            .map_err(|_| QuireError::PdfError(format!("page index {index} out of range")))?;
        let page_id = *pages.get(&number).ok_or_else(|| {
            QuireError::PdfError(format!(
                "page index {index} out of range (document has {} pages)",
                pages.len()
            ))
        })?;
        graft_page(source, target, page_id)
    }

    fn base_rotation(&self, doc: &Document, page: ObjectId) -> Result<i32> {
        let dict = doc
            .get_object(page)
            .and_then(Object::as_dict)
            .map_err(|err| QuireError::PdfError(format!("cannot read page {page:?}: {err}")))?;
        let degrees = dict
            .get(b"Rotate")
            .ok()
            .and_then(|obj| match obj {
                Object::Integer(value) => Some(*value as i32),
                Object::Reference(id) => doc
                    .get_object(*id)
                    .ok()
                    .and_then(|o| o.as_i64().ok())
                    .map(|v| v as i32),
                _ => None,
            })
            .unwrap_or(0);
        Ok(degrees.rem_euclid(360))
    }

    fn set_rotation(&self, doc: &mut Document, page: ObjectId, degrees: i32) -> Result<()> {
        let object = doc
            .get_object_mut(page)
            .map_err(|err| QuireError::PdfError(format!("cannot read page {page:?}: {err}")))?;
        match object {
            Object::Dictionary(dict) => {
                dict.set("Rotate", Object::Integer(i64::from(degrees.rem_euclid(360))));
                Ok(())
            }
            _ => Err(QuireError::PdfError(format!(
                "object {page:?} is not a page dictionary"
            ))),
        }
    }

    fn serialize(&self, doc: &Document) -> Result<Vec<u8>> {
        // save_to renumbers and compacts, so it needs a mutable document;
        // work on a clone to keep the codec side-effect free.
        let mut output = Vec::new();
        doc.clone()
            .save_to(&mut output)
            .map_err(|err| QuireError::PdfError(format!("failed to serialise PDF: {err}")))?;
        Ok(output)
    }
}

// -- Page grafting ------------------------------------------------------------

/// Deep-clone `page_id` from `source` into `target` and append it to the
/// target's page tree. Returns the id of the grafted page in `target`.
fn graft_page(source: &Document, target: &mut Document, page_id: ObjectId) -> Result<ObjectId> {
    let page_object = source
        .get_object(page_id)
        .map_err(|err| QuireError::PdfError(format!("cannot read page {page_id:?}: {err}")))?;

    // Seed the id map with the page itself so back-references into it (an
    // annotation's /P, for instance) resolve to the grafted page instead of
    // recursing.
    let grafted_id = target.new_object_id();
    let mut cloned_ids = HashMap::from([(page_id, grafted_id)]);
    let cloned = clone_object_tree(source, target, page_object, &mut cloned_ids)?;
    target.objects.insert(grafted_id, cloned);

    let pages_id = page_tree_root(target)?;

    // Append to /Kids and bump /Count on the target's page tree node.
    if let Ok(Object::Dictionary(pages_dict)) = target.get_object_mut(pages_id) {
        if let Ok(Object::Array(kids)) = pages_dict.get_mut(b"Kids") {
            kids.push(Object::Reference(grafted_id));
        }
        if let Ok(Object::Integer(count)) = pages_dict.get_mut(b"Count") {
            *count += 1;
        }
    }

    // The /Parent skipped during cloning now points at the target's tree.
    if let Ok(Object::Dictionary(page_dict)) = target.get_object_mut(grafted_id) {
        page_dict.set("Parent", Object::Reference(pages_id));
    }

    debug!(?page_id, ?grafted_id, "page grafted");
    Ok(grafted_id)
}

/// Resolve the /Pages node referenced from the document catalog.
fn page_tree_root(doc: &Document) -> Result<ObjectId> {
    let catalog = doc
        .catalog()
        .map_err(|err| QuireError::PdfError(format!("document has no catalog: {err}")))?;
    match catalog.get(b"Pages") {
        Ok(Object::Reference(id)) => Ok(*id),
        Ok(_) => Err(QuireError::PdfError(
            "/Pages entry is not a reference".to_string(),
        )),
        Err(err) => Err(QuireError::PdfError(format!("catalog has no /Pages: {err}"))),
    }
}

/// Deep-clone one object from `source` into `target`, recursively resolving
/// references. /Parent is skipped to break the cycle back into the source's
/// page tree; the caller patches it after the graft.
///
/// `cloned_ids` maps source ids to their clones in the target. Every
/// reference is cloned at most once, so reference cycles (annotation /P
/// entries, cross-linked outlines) terminate and resources shared between
/// objects stay shared in the target.
fn clone_object_tree(
    source: &Document,
    target: &mut Document,
    object: &Object,
    cloned_ids: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match object {
        Object::Dictionary(dict) => {
            let mut cloned = lopdf::Dictionary::new();
            for (key, value) in dict.iter() {
                if key == b"Parent" {
                    continue;
                }
                cloned.set(key.clone(), clone_object_tree(source, target, value, cloned_ids)?);
            }
            Ok(Object::Dictionary(cloned))
        }
        Object::Array(items) => {
            let mut cloned = Vec::with_capacity(items.len());
            for item in items {
                cloned.push(clone_object_tree(source, target, item, cloned_ids)?);
            }
            Ok(Object::Array(cloned))
        }
        Object::Reference(id) => {
            if let Some(mapped) = cloned_ids.get(id) {
                return Ok(Object::Reference(*mapped));
            }
            match source.get_object(*id) {
                Ok(referenced) => {
                    // Reserve the target id before recursing so any
                    // back-reference to `id` inside the subtree resolves
                    // through the map.
                    let new_id = target.new_object_id();
                    cloned_ids.insert(*id, new_id);
                    let cloned = clone_object_tree(source, target, referenced, cloned_ids)?;
                    target.objects.insert(new_id, cloned);
                    Ok(Object::Reference(new_id))
                }
                Err(err) => {
                    warn!(?id, %err, "unresolvable reference replaced with null");
                    Ok(Object::Null)
                }
            }
        }
        Object::Stream(stream) => {
            let mut cloned_dict = lopdf::Dictionary::new();
            for (key, value) in stream.dict.iter() {
                if key == b"Parent" {
                    continue;
                }
                cloned_dict.set(key.clone(), clone_object_tree(source, target, value, cloned_ids)?);
            }
            Ok(Object::Stream(lopdf::Stream::new(
                cloned_dict,
                stream.content.clone(),
            )))
        }
        other => Ok(other.clone()),
    }
}

// SPDX-License-Identifier: MIT
//
// Form flattening — strip interactive form machinery, leaving page content
// intact.
//
// Removes the /AcroForm dictionary from the catalog and every Widget
// annotation from the pages. Non-widget annotations (notes, links) are kept.
// Field appearance streams already painted into page content are unaffected.

use lopdf::{Document, Object, ObjectId};
use quire_core::error::{QuireError, Result};
use tracing::{debug, info, instrument};

/// Flatten the document in `bytes`, returning it without interactive form
/// structure.
#[instrument(skip_all, fields(bytes_len = bytes.len()))]
pub fn flatten(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut doc = Document::load_mem(bytes)
        .map_err(|err| QuireError::CorruptInput(format!("failed to parse PDF: {err}")))?;

    let removed_form = remove_acro_form(&mut doc)?;

    let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();
    let mut removed_widgets = 0usize;
    for page_id in &page_ids {
        removed_widgets += strip_widget_annotations(&mut doc, *page_id)?;
    }

    info!(removed_form, removed_widgets, "document flattened");

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|err| QuireError::PdfError(format!("failed to serialise flattened PDF: {err}")))?;
    Ok(output)
}

/// Drop the catalog's /AcroForm entry. Returns whether one was present.
fn remove_acro_form(doc: &mut Document) -> Result<bool> {
    let catalog_id = match doc.trailer.get(b"Root") {
        Ok(Object::Reference(id)) => *id,
        _ => {
            return Err(QuireError::PdfError(
                "document has no catalog reference".to_string(),
            ));
        }
    };
    match doc.get_object_mut(catalog_id) {
        Ok(Object::Dictionary(catalog)) => Ok(catalog.remove(b"AcroForm").is_some()),
        _ => Err(QuireError::PdfError(
            "document catalog is not a dictionary".to_string(),
        )),
    }
}

/// Remove Widget annotations from one page's /Annots. Returns how many were
/// removed.
fn strip_widget_annotations(doc: &mut Document, page_id: ObjectId) -> Result<usize> {
    // /Annots may be inline or an indirect reference to the array.
    let (annots, indirect) = {
        let dict = doc
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(|err| QuireError::PdfError(format!("cannot read page {page_id:?}: {err}")))?;
        match dict.get(b"Annots") {
            Ok(Object::Array(items)) => (items.clone(), None),
            Ok(Object::Reference(id)) => match doc.get_object(*id) {
                Ok(Object::Array(items)) => (items.clone(), Some(*id)),
                _ => return Ok(0),
            },
            _ => return Ok(0),
        }
    };

    let kept: Vec<Object> = annots
        .iter()
        .filter(|annot| !is_widget(doc, annot))
        .cloned()
        .collect();
    let removed = annots.len() - kept.len();
    if removed == 0 {
        return Ok(0);
    }

    match indirect {
        Some(array_id) => {
            if let Ok(object) = doc.get_object_mut(array_id) {
                *object = Object::Array(kept);
            }
        }
        None => {
            if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
                if kept.is_empty() {
                    dict.remove(b"Annots");
                } else {
                    dict.set("Annots", Object::Array(kept));
                }
            }
        }
    }

    debug!(?page_id, removed, "widget annotations stripped");
    Ok(removed)
}

/// Whether an /Annots entry (inline or referenced) is a Widget annotation.
fn is_widget(doc: &Document, annot: &Object) -> bool {
    let dict = match annot {
        Object::Dictionary(dict) => dict,
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(Object::Dictionary(dict)) => dict,
            _ => return false,
        },
        _ => return false,
    };
    matches!(dict.get(b"Subtype"), Ok(Object::Name(name)) if name == b"Widget")
}

// SPDX-License-Identifier: MIT
//
// Document information metadata — read and edit the trailer /Info
// dictionary.
//
// Only the standard descriptive fields are exposed. Fields the caller does
// not provide are left exactly as the document carries them.

use lopdf::{Document, Object, StringFormat};
use quire_core::error::{QuireError, Result};
use tracing::{info, instrument};

/// Descriptive document information fields.
///
/// `None` means the field is absent (when reading) or left untouched (when
/// applying).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
}

impl DocumentMetadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.subject.is_none()
            && self.keywords.is_none()
    }
}

/// Read the information fields of the document in `bytes`.
#[instrument(skip_all, fields(bytes_len = bytes.len()))]
pub fn read(bytes: &[u8]) -> Result<DocumentMetadata> {
    let doc = Document::load_mem(bytes)
        .map_err(|err| QuireError::CorruptInput(format!("failed to parse PDF: {err}")))?;

    let Some(dict) = info_dict(&doc) else {
        return Ok(DocumentMetadata::default());
    };
    Ok(DocumentMetadata {
        title: text_field(dict, b"Title"),
        author: text_field(dict, b"Author"),
        subject: text_field(dict, b"Subject"),
        keywords: text_field(dict, b"Keywords"),
    })
}

/// Write the provided information fields into the document in `bytes`,
/// creating the /Info dictionary if the document has none.
#[instrument(skip_all, fields(bytes_len = bytes.len()))]
pub fn apply(bytes: &[u8], metadata: &DocumentMetadata) -> Result<Vec<u8>> {
    let mut doc = Document::load_mem(bytes)
        .map_err(|err| QuireError::CorruptInput(format!("failed to parse PDF: {err}")))?;

    let info_id = match doc.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => *id,
        Ok(Object::Dictionary(inline)) => {
            // Inline /Info is legal but rare; promote it to an indirect
            // object so it can be edited in place.
            let promoted = inline.clone();
            let id = doc.add_object(Object::Dictionary(promoted));
            doc.trailer.set("Info", Object::Reference(id));
            id
        }
        _ => {
            let id = doc.add_object(Object::Dictionary(lopdf::Dictionary::new()));
            doc.trailer.set("Info", Object::Reference(id));
            id
        }
    };

    if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(info_id) {
        set_field(dict, "Title", metadata.title.as_deref());
        set_field(dict, "Author", metadata.author.as_deref());
        set_field(dict, "Subject", metadata.subject.as_deref());
        set_field(dict, "Keywords", metadata.keywords.as_deref());
    }

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|err| QuireError::PdfError(format!("failed to serialise PDF: {err}")))?;

    info!(output_bytes = output.len(), "metadata written");
    Ok(output)
}

fn info_dict(doc: &Document) -> Option<&lopdf::Dictionary> {
    match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn text_field(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(raw, _) => Some(decode_text(raw)),
        _ => None,
    }
}

/// PDF text strings are either UTF-16BE with a byte-order mark or a
/// one-byte encoding close enough to Latin-1 for descriptive fields.
fn decode_text(raw: &[u8]) -> String {
    if let Some(body) = raw.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(raw).into_owned()
    }
}

fn set_field(dict: &mut lopdf::Dictionary, key: &str, value: Option<&str>) {
    let Some(value) = value else { return };
    let object = if value.is_ascii() {
        Object::string_literal(value)
    } else {
        let mut raw = vec![0xFE, 0xFF];
        for unit in value.encode_utf16() {
            raw.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(raw, StringFormat::Literal)
    };
    dict.set(key, object);
}

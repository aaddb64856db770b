// SPDX-License-Identifier: MIT
//
// Watermarking — stamp a semi-transparent diagonal text banner onto every
// page of a document.
//
// The stamp is an extra content stream appended to each page's /Contents,
// drawing with a private font (/QWMf) and graphics state (/QWMgs) entry
// injected into the page resources. Existing page content is never touched,
// so the operation composes with any prior transform.

use std::fmt::Write as _;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use quire_core::error::{QuireError, Result};
use tracing::{debug, info, instrument};

const FONT_RESOURCE: &str = "QWMf";
const GSTATE_RESOURCE: &str = "QWMgs";

/// US Letter, used when a page carries no resolvable MediaBox.
const FALLBACK_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Appearance of the stamped banner.
#[derive(Debug, Clone)]
pub struct WatermarkOptions {
    pub text: String,
    pub font_size: f32,
    /// Fill alpha, 0.0 (invisible) to 1.0 (opaque).
    pub opacity: f32,
    /// Counter-clockwise angle in degrees.
    pub angle_degrees: f32,
    /// Fill colour as RGB components in 0.0..=1.0.
    pub color: (f32, f32, f32),
}

impl WatermarkOptions {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: 48.0,
            opacity: 0.3,
            angle_degrees: 45.0,
            color: (0.6, 0.6, 0.6),
        }
    }
}

/// Stamp `options.text` across every page of the document in `bytes`.
#[instrument(skip_all, fields(text = %options.text, bytes_len = bytes.len()))]
pub fn apply(bytes: &[u8], options: &WatermarkOptions) -> Result<Vec<u8>> {
    let mut doc = Document::load_mem(bytes)
        .map_err(|err| QuireError::CorruptInput(format!("failed to parse PDF: {err}")))?;

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let gstate_id = doc.add_object(dictionary! {
        "Type" => "ExtGState",
        "ca" => Object::Real(options.opacity),
        "CA" => Object::Real(options.opacity),
    });

    let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();
    for page_id in &page_ids {
        let media_box = page_media_box(&doc, *page_id);
        inject_resources(&mut doc, *page_id, font_id, gstate_id)?;

        let content = stamp_stream(options, media_box);
        append_content(&mut doc, *page_id, &content)?;
    }

    info!(pages = page_ids.len(), "watermark applied");

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|err| QuireError::PdfError(format!("failed to serialise watermarked PDF: {err}")))?;
    Ok(output)
}

// -- Stamp geometry ------------------------------------------------------------

/// Build the stamp content stream for one page.
///
/// The text is placed via a rotation matrix centred on the page, shifted back
/// by half its estimated width so the banner straddles the page centre.
fn stamp_stream(options: &WatermarkOptions, media_box: [f32; 4]) -> String {
    let width = media_box[2] - media_box[0];
    let height = media_box[3] - media_box[1];
    let centre_x = media_box[0] + width / 2.0;
    let centre_y = media_box[1] + height / 2.0;

    let radians = options.angle_degrees.to_radians();
    let (sin, cos) = radians.sin_cos();

    // Average Helvetica-Bold glyph width is roughly half the font size.
    let estimated_width = 0.5 * options.font_size * options.text.len() as f32;
    let tx = centre_x - (estimated_width / 2.0) * cos;
    let ty = centre_y - (estimated_width / 2.0) * sin;

    let (r, g, b) = options.color;
    let mut content = String::new();
    content.push_str("q\n");
    let _ = writeln!(content, "/{GSTATE_RESOURCE} gs");
    let _ = writeln!(content, "{r} {g} {b} rg");
    content.push_str("BT\n");
    let _ = writeln!(content, "/{FONT_RESOURCE} {} Tf", options.font_size);
    let _ = writeln!(content, "{cos} {sin} {} {cos} {tx} {ty} Tm", -sin);
    let _ = writeln!(content, "({}) Tj", escape_pdf_string(&options.text));
    content.push_str("ET\nQ\n");
    content
}

/// Escape a string for inclusion in a PDF literal string.
fn escape_pdf_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            other => escaped.push(other),
        }
    }
    escaped
}

// -- Page plumbing -------------------------------------------------------------

/// Resolve a page's MediaBox, walking up the page tree with a depth limit.
fn page_media_box(doc: &Document, page_id: ObjectId) -> [f32; 4] {
    let mut current = doc.get_object(page_id).ok();
    for _ in 0..10 {
        let Some(Object::Dictionary(dict)) = current else {
            break;
        };
        if let Some(values) = read_media_box(doc, dict) {
            return values;
        }
        current = match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => doc.get_object(*parent).ok(),
            _ => None,
        };
    }
    FALLBACK_MEDIA_BOX
}

fn read_media_box(doc: &Document, dict: &Dictionary) -> Option<[f32; 4]> {
    let entry = dict.get(b"MediaBox").ok()?;
    let array = match entry {
        Object::Array(array) => array,
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(Object::Array(array)) => array,
            _ => return None,
        },
        _ => return None,
    };
    if array.len() != 4 {
        return None;
    }
    let mut values = [0.0f32; 4];
    for (slot, object) in values.iter_mut().zip(array) {
        *slot = match object {
            Object::Integer(i) => *i as f32,
            Object::Real(r) => *r,
            _ => return None,
        };
    }
    Some(values)
}

/// Make /QWMf and /QWMgs resolvable from the page's resource dictionary.
fn inject_resources(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
    gstate_id: ObjectId,
) -> Result<()> {
    insert_resource(doc, page_id, "Font", FONT_RESOURCE, font_id)?;
    insert_resource(doc, page_id, "ExtGState", GSTATE_RESOURCE, gstate_id)
}

/// Insert `name -> target` under the `class` sub-dictionary of the page's
/// /Resources, handling inline, indirect, and missing dictionaries at both
/// levels.
fn insert_resource(
    doc: &mut Document,
    page_id: ObjectId,
    class: &str,
    name: &str,
    target: ObjectId,
) -> Result<()> {
    let page_dict = page_dictionary(doc, page_id)?;
    let resources_ref = match page_dict.get(b"Resources") {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    };

    // Where does the class sub-dictionary live right now?
    let resources = match resources_ref {
        Some(id) => match doc.get_object(id) {
            Ok(Object::Dictionary(dict)) => Some(dict),
            _ => None,
        },
        None => match page_dictionary(doc, page_id)?.get(b"Resources") {
            Ok(Object::Dictionary(dict)) => Some(dict),
            _ => None,
        },
    };
    let class_ref = resources.and_then(|dict| match dict.get(class.as_bytes()) {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    });

    if let Some(id) = class_ref {
        // Indirect class dictionary; mutate it in place.
        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(id) {
            dict.set(name, Object::Reference(target));
            return Ok(());
        }
        return Err(QuireError::PdfError(format!(
            "page {page_id:?} has a malformed /{class} resource"
        )));
    }

    let resources_dict = match resources_ref {
        Some(id) => match doc.get_object_mut(id) {
            Ok(Object::Dictionary(dict)) => dict,
            _ => {
                return Err(QuireError::PdfError(format!(
                    "page {page_id:?} has a malformed /Resources reference"
                )));
            }
        },
        None => {
            let page = page_dictionary_mut(doc, page_id)?;
            if !matches!(page.get(b"Resources"), Ok(Object::Dictionary(_))) {
                page.set("Resources", Object::Dictionary(Dictionary::new()));
            }
            match page.get_mut(b"Resources") {
                Ok(Object::Dictionary(dict)) => dict,
                _ => unreachable!("just installed"),
            }
        }
    };

    match resources_dict.get_mut(class.as_bytes()) {
        Ok(Object::Dictionary(dict)) => {
            dict.set(name, Object::Reference(target));
        }
        _ => {
            let mut fresh = Dictionary::new();
            fresh.set(name, Object::Reference(target));
            resources_dict.set(class, Object::Dictionary(fresh));
        }
    }
    Ok(())
}

/// Append `content` as a new stream after the page's existing /Contents.
fn append_content(doc: &mut Document, page_id: ObjectId, content: &str) -> Result<()> {
    let stream = Stream::new(Dictionary::new(), content.as_bytes().to_vec());
    let content_id = doc.add_object(Object::Stream(stream));

    let page = page_dictionary_mut(doc, page_id)?;
    let existing = page.get(b"Contents").ok().cloned();
    match existing {
        Some(Object::Reference(first)) => {
            page.set(
                "Contents",
                Object::Array(vec![
                    Object::Reference(first),
                    Object::Reference(content_id),
                ]),
            );
        }
        Some(Object::Array(mut streams)) => {
            streams.push(Object::Reference(content_id));
            page.set("Contents", Object::Array(streams));
        }
        _ => {
            page.set("Contents", Object::Reference(content_id));
        }
    }
    debug!(?page_id, "stamp stream appended");
    Ok(())
}

fn page_dictionary(doc: &Document, page_id: ObjectId) -> Result<&Dictionary> {
    doc.get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|err| QuireError::PdfError(format!("cannot read page {page_id:?}: {err}")))
}

fn page_dictionary_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary> {
    match doc.get_object_mut(page_id) {
        Ok(Object::Dictionary(dict)) => Ok(dict),
        Ok(_) => Err(QuireError::PdfError(format!(
            "object {page_id:?} is not a page dictionary"
        ))),
        Err(err) => Err(QuireError::PdfError(format!(
            "cannot read page {page_id:?}: {err}"
        ))),
    }
}

// SPDX-License-Identifier: MIT
//
// Test fixtures — minimal but structurally valid PDFs built object by
// object, so tests do not depend on binary fixture files.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

/// Build a PDF with one page per entry in `page_texts`, each page carrying a
/// short Helvetica text stream.
pub(crate) fn sample_pdf(page_texts: &[&str]) -> Vec<u8> {
    let (mut doc, page_tree_id, page_ids) = sample_document(page_texts);
    finish(&mut doc, page_tree_id, &page_ids, Vec::new())
}

/// Like [`sample_pdf`], but with an /AcroForm entry in the catalog and two
/// annotations on the first page: one Widget (a form field) and one Text
/// (a sticky note).
pub(crate) fn sample_pdf_with_form(page_texts: &[&str]) -> Vec<u8> {
    let (mut doc, page_tree_id, page_ids) = sample_document(page_texts);

    let widget_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Tx",
        "T" => Object::string_literal("field1"),
        "Rect" => Object::Array(vec![10.into(), 10.into(), 110.into(), 30.into()]),
    });
    let note_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Text",
        "Contents" => Object::string_literal("a note"),
        "Rect" => Object::Array(vec![200.into(), 200.into(), 220.into(), 220.into()]),
    });

    if let Ok(Object::Dictionary(page)) = doc.get_object_mut(page_ids[0]) {
        page.set(
            "Annots",
            Object::Array(vec![
                Object::Reference(widget_id),
                Object::Reference(note_id),
            ]),
        );
    }

    let acro_form = vec![(
        "AcroForm".to_string(),
        Object::Dictionary(dictionary! {
            "Fields" => Object::Array(vec![Object::Reference(widget_id)]),
        }),
    )];
    finish(&mut doc, page_tree_id, &page_ids, acro_form)
}

/// Like [`sample_pdf`], but the first page carries a Link annotation whose
/// /P entry points back at the page, the way most producers write
/// annotations.
pub(crate) fn sample_pdf_with_page_backref(page_texts: &[&str]) -> Vec<u8> {
    let (mut doc, page_tree_id, page_ids) = sample_document(page_texts);

    let link_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => Object::Array(vec![10.into(), 10.into(), 110.into(), 30.into()]),
        "P" => Object::Reference(page_ids[0]),
    });
    if let Ok(Object::Dictionary(page)) = doc.get_object_mut(page_ids[0]) {
        page.set("Annots", Object::Array(vec![Object::Reference(link_id)]));
    }

    finish(&mut doc, page_tree_id, &page_ids, Vec::new())
}

fn sample_document(page_texts: &[&str]) -> (Document, ObjectId, Vec<ObjectId>) {
    let mut doc = Document::with_version("1.5");
    let page_tree_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => Object::Dictionary(dictionary! {
            "F1" => Object::Reference(font_id),
        }),
    });

    let mut page_ids = Vec::with_capacity(page_texts.len());
    for text in page_texts {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            lopdf::Dictionary::new(),
            content.encode().unwrap_or_default(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(page_tree_id),
            "Contents" => Object::Reference(content_id),
            "Resources" => Object::Reference(resources_id),
            "MediaBox" => Object::Array(vec![0.into(), 0.into(), 612.into(), 792.into()]),
        });
        page_ids.push(page_id);
    }

    (doc, page_tree_id, page_ids)
}

fn finish(
    doc: &mut Document,
    page_tree_id: ObjectId,
    page_ids: &[ObjectId],
    extra_catalog_entries: Vec<(String, Object)>,
) -> Vec<u8> {
    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let page_tree = dictionary! {
        "Type" => "Pages",
        "Kids" => Object::Array(kids),
        "Count" => Object::Integer(page_ids.len() as i64),
    };
    doc.objects
        .insert(page_tree_id, Object::Dictionary(page_tree));

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(page_tree_id),
    };
    for (key, value) in extra_catalog_entries {
        catalog.set(key, value);
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut output = Vec::new();
    doc.save_to(&mut output).expect("fixture must serialise");
    output
}

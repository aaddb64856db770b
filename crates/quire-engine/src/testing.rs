// SPDX-License-Identifier: MIT
//
// Test doubles for the collaborator traits.
//
// The mock codec treats a document as a comma-separated list of page labels,
// with an optional `@degrees` suffix carrying the page's stored rotation
// (`b"A0,A1@90"` = two pages, the second pre-rotated). Serialisation is the
// inverse, so assembly results can be asserted as plain byte strings.

use quire_core::error::{QuireError, Result};
use quire_core::types::Rotation;

use crate::assembly::SourceDocument;
use crate::traits::{PageCodec, PageRenderer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MockPage {
    pub label: String,
    pub rotation: i32,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MockDoc {
    pub pages: Vec<MockPage>,
}

pub(crate) struct MockCodec;

impl PageCodec for MockCodec {
    type Document = MockDoc;
    type PageHandle = usize;

    fn load(&self, bytes: &[u8]) -> Result<MockDoc> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| QuireError::CorruptInput("not utf-8".into()))?;
        if text.is_empty() {
            return Err(QuireError::CorruptInput("empty document".into()));
        }
        let pages = text
            .split(',')
            .map(|part| {
                let (label, rotation) = match part.split_once('@') {
                    Some((label, deg)) => {
                        let rotation = deg
                            .parse::<i32>()
                            .map_err(|_| QuireError::CorruptInput(format!("bad page: {part}")))?;
                        (label, rotation)
                    }
                    None => (part, 0),
                };
                Ok(MockPage {
                    label: label.to_string(),
                    rotation,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(MockDoc { pages })
    }

    fn page_count(&self, doc: &MockDoc) -> usize {
        doc.pages.len()
    }

    fn create_empty(&self) -> MockDoc {
        MockDoc::default()
    }

    fn copy_page(&self, source: &MockDoc, index: usize, target: &mut MockDoc) -> Result<usize> {
        let page = source
            .pages
            .get(index)
            .ok_or_else(|| QuireError::PdfError(format!("page {index} out of range")))?;
        target.pages.push(page.clone());
        Ok(target.pages.len() - 1)
    }

    fn base_rotation(&self, doc: &MockDoc, page: usize) -> Result<i32> {
        doc.pages
            .get(page)
            .map(|p| p.rotation)
            .ok_or_else(|| QuireError::PdfError(format!("handle {page} invalid")))
    }

    fn set_rotation(&self, doc: &mut MockDoc, page: usize, degrees: i32) -> Result<()> {
        let page = doc
            .pages
            .get_mut(page)
            .ok_or_else(|| QuireError::PdfError(format!("handle {page} invalid")))?;
        page.rotation = degrees.rem_euclid(360);
        Ok(())
    }

    fn serialize(&self, doc: &MockDoc) -> Result<Vec<u8>> {
        let encoded = doc
            .pages
            .iter()
            .map(|p| {
                if p.rotation == 0 {
                    p.label.clone()
                } else {
                    format!("{}@{}", p.label, p.rotation)
                }
            })
            .collect::<Vec<_>>()
            .join(",");
        Ok(encoded.into_bytes())
    }
}

/// Load bytes through the mock codec and wrap them as a registrable source.
pub(crate) fn load_source(
    codec: &MockCodec,
    bytes: &[u8],
    name: &str,
) -> SourceDocument<MockDoc> {
    let doc = codec.load(bytes).expect("mock load");
    let pages = codec.page_count(&doc);
    SourceDocument::new(doc, pages, name, quire_core::fingerprint::hash_bytes(bytes))
}

/// Renderer double that records how many renders were performed.
#[derive(Default)]
pub(crate) struct CountingRenderer {
    pub renders: std::cell::Cell<usize>,
}

impl PageRenderer<MockDoc> for CountingRenderer {
    type Bitmap = String;

    fn render(
        &self,
        doc: &MockDoc,
        index: usize,
        _scale: f32,
        rotation: Rotation,
    ) -> Result<String> {
        self.renders.set(self.renders.get() + 1);
        let label = doc
            .pages
            .get(index)
            .map(|p| p.label.as_str())
            .unwrap_or("?");
        Ok(format!("{label}/{}", rotation.degrees()))
    }
}

// SPDX-License-Identifier: MIT
//
// organize — reorder, rotate, and delete pages in one pass.
//
// Page numbers on the command line are 1-based positions in the ORIGINAL
// document; internally every page keeps a stable identity, so deletions and
// reorders never shift what a later flag refers to.

use std::collections::BTreeSet;
use std::path::Path;

use quire_core::error::{QuireError, Result};
use quire_core::types::PageId;
use quire_document::PdfCodec;
use quire_engine::Session;
use tracing::info;

use crate::shared::{file_name, parse_page_list, parse_rotation_spec, read_file, write_file};

pub fn run(
    input: &Path,
    output: &Path,
    delete: Option<&str>,
    rotate: &[String],
    order: Option<&str>,
) -> Result<()> {
    let bytes = read_file(input)?;
    let mut session: Session<PdfCodec> = Session::new(PdfCodec::new());
    session.load_source(&bytes, &file_name(input))?;

    // Identities in original page order; flag resolution goes through this
    // table so earlier mutations cannot shift later references.
    let ids = session.collection().ids();
    let total = ids.len();
    let id_for = |page: u32| -> Result<PageId> {
        ids.get(page as usize - 1).copied().ok_or_else(|| {
            QuireError::CorruptInput(format!(
                "page {page} out of range (document has {total} pages)"
            ))
        })
    };

    let deleted: BTreeSet<u32> = match delete {
        Some(spec) => parse_page_list(spec)?.into_iter().collect(),
        None => BTreeSet::new(),
    };
    for page in &deleted {
        session.remove_page(id_for(*page)?)?;
    }

    for spec in rotate {
        let (page, degrees) = parse_rotation_spec(spec)?;
        if deleted.contains(&page) {
            return Err(QuireError::CorruptInput(format!(
                "cannot rotate page {page}: it is deleted"
            )));
        }
        session.rotate_page(id_for(page)?, degrees)?;
    }

    if let Some(spec) = order {
        let order = parse_page_list(spec)?;
        let surviving: BTreeSet<u32> =
            (1..=total as u32).filter(|p| !deleted.contains(p)).collect();
        let ordered: BTreeSet<u32> = order.iter().copied().collect();
        if ordered != surviving || order.len() != surviving.len() {
            return Err(QuireError::CorruptInput(format!(
                "--order must list every surviving page exactly once ({} pages)",
                surviving.len()
            )));
        }
        for (position, page) in order.iter().enumerate() {
            session.move_page(id_for(*page)?, position)?;
        }
    }

    info!(
        deleted = deleted.len(),
        rotated = rotate.len(),
        pages = session.collection().len(),
        "organize complete"
    );

    let organized = session.assemble_bytes()?;
    write_file(output, &organized)
}

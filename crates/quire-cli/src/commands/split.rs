// SPDX-License-Identifier: MIT
//
// split — write one single-page PDF per page of the input.

use std::path::Path;

use quire_core::error::Result;
use quire_document::PdfCodec;
use quire_engine::Session;
use tracing::info;

use crate::shared::{file_name, read_file, write_file};

pub fn run(input: &Path, out_dir: &Path) -> Result<()> {
    let bytes = read_file(input)?;
    let mut session: Session<PdfCodec> = Session::new(PdfCodec::new());
    let source = session.load_source(&bytes, &file_name(input))?;

    std::fs::create_dir_all(out_dir)?;
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string());

    let plan = session.split(source)?;
    let total = plan.remaining();
    for (index, part) in plan.enumerate() {
        let part = part?;
        let path = out_dir.join(format!("{stem}_page_{:03}.pdf", index + 1));
        write_file(&path, &part)?;
    }

    info!(pages = total, out_dir = %out_dir.display(), "split complete");
    Ok(())
}

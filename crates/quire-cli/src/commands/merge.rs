// SPDX-License-Identifier: MIT
//
// merge — combine PDFs into one document, pages in argument order.

use std::path::{Path, PathBuf};

use quire_core::error::Result;
use quire_document::PdfCodec;
use quire_engine::Session;
use tracing::info;

use crate::shared::{file_name, read_file, write_file};

pub fn run(inputs: &[PathBuf], output: &Path) -> Result<()> {
    let mut session: Session<PdfCodec> = Session::new(PdfCodec::new());
    for path in inputs {
        let bytes = read_file(path)?;
        session.load_source(&bytes, &file_name(path))?;
    }

    info!(
        inputs = inputs.len(),
        pages = session.collection().len(),
        "merging documents"
    );

    let merged = session.assemble_bytes()?;
    write_file(output, &merged)
}

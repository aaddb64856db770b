// SPDX-License-Identifier: MIT
//
// img2pdf — build a PDF out of raster images, one page per image.

use std::path::{Path, PathBuf};

use quire_core::error::Result;
use quire_document::ImageComposer;
use tracing::info;

use crate::shared::{read_file, write_file};

pub fn run(inputs: &[PathBuf], output: &Path, title: &str) -> Result<()> {
    let mut images = Vec::with_capacity(inputs.len());
    for path in inputs {
        images.push(read_file(path)?);
    }

    info!(images = images.len(), "composing image PDF");
    let pdf = ImageComposer::new(title).compose(&images)?;
    write_file(output, &pdf)
}

// SPDX-License-Identifier: MIT
//
// Single-pass transforms: watermark, protect, unlock, flatten.

use std::path::Path;

use quire_core::error::Result;
use quire_document::WatermarkOptions;
use quire_document::pdf::{flatten, security, watermark};

use crate::shared::{read_file, write_file};

pub fn watermark(
    input: &Path,
    output: &Path,
    text: &str,
    font_size: f32,
    opacity: f32,
    angle: f32,
) -> Result<()> {
    let bytes = read_file(input)?;
    let options = WatermarkOptions {
        font_size,
        opacity,
        angle_degrees: angle,
        ..WatermarkOptions::new(text)
    };
    write_file(output, &watermark::apply(&bytes, &options)?)
}

pub fn protect(input: &Path, output: &Path, password: &str) -> Result<()> {
    let bytes = read_file(input)?;
    write_file(output, &security::protect(&bytes, password)?)
}

pub fn unlock(input: &Path, output: &Path, password: &str) -> Result<()> {
    let bytes = read_file(input)?;
    write_file(output, &security::unlock(&bytes, password)?)
}

pub fn flatten(input: &Path, output: &Path) -> Result<()> {
    let bytes = read_file(input)?;
    write_file(output, &flatten::flatten(&bytes)?)
}

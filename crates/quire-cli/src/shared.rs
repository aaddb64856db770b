// SPDX-License-Identifier: MIT
//
// Shared helpers for command implementations: page-list parsing and file IO
// with uniform error mapping.

use std::path::Path;

use quire_core::error::{QuireError, Result};

/// Parse a 1-based page list like `1,3-5,8` into page numbers, preserving
/// order and duplicates as written.
pub fn parse_page_list(spec: &str) -> Result<Vec<u32>> {
    let mut pages = Vec::new();
    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match part.split_once('-') {
            Some((start, end)) => {
                let start: u32 = parse_page_number(start)?;
                let end: u32 = parse_page_number(end)?;
                if start > end {
                    return Err(QuireError::CorruptInput(format!(
                        "invalid page range '{part}': start exceeds end"
                    )));
                }
                pages.extend(start..=end);
            }
            None => pages.push(parse_page_number(part)?),
        }
    }
    if pages.is_empty() {
        return Err(QuireError::CorruptInput(format!(
            "no pages in list '{spec}'"
        )));
    }
    Ok(pages)
}

/// Parse a `PAGE:DEGREES` rotation spec.
pub fn parse_rotation_spec(spec: &str) -> Result<(u32, i32)> {
    let (page, degrees) = spec.split_once(':').ok_or_else(|| {
        QuireError::CorruptInput(format!("invalid rotation '{spec}': expected PAGE:DEGREES"))
    })?;
    let page = parse_page_number(page)?;
    let degrees: i32 = degrees.trim().parse().map_err(|_| {
        QuireError::CorruptInput(format!("invalid rotation degrees in '{spec}'"))
    })?;
    if degrees % 90 != 0 {
        return Err(QuireError::CorruptInput(format!(
            "rotation must be a multiple of 90, got {degrees}"
        )));
    }
    Ok((page, degrees))
}

fn parse_page_number(text: &str) -> Result<u32> {
    let number: u32 = text
        .trim()
        .parse()
        .map_err(|_| QuireError::CorruptInput(format!("invalid page number '{}'", text.trim())))?;
    if number == 0 {
        return Err(QuireError::CorruptInput(
            "page numbers are 1-based".to_string(),
        ));
    }
    Ok(number)
}

pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|err| {
        QuireError::CorruptInput(format!("cannot read {}: {err}", path.display()))
    })
}

pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "output written");
    Ok(())
}

/// Display name for a source file.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

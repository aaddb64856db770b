// SPDX-License-Identifier: MIT
//
// metadata — show or edit document information fields.

use std::path::Path;

use quire_core::error::{QuireError, Result};
use quire_document::DocumentMetadata;
use quire_document::pdf::metadata;

use crate::shared::{read_file, write_file};

pub fn run(
    input: &Path,
    output: Option<&Path>,
    title: Option<String>,
    author: Option<String>,
    subject: Option<String>,
    keywords: Option<String>,
) -> Result<()> {
    let bytes = read_file(input)?;
    let edits = DocumentMetadata {
        title,
        author,
        subject,
        keywords,
    };

    if edits.is_empty() {
        let current = metadata::read(&bytes)?;
        print_field("Title", current.title.as_deref());
        print_field("Author", current.author.as_deref());
        print_field("Subject", current.subject.as_deref());
        print_field("Keywords", current.keywords.as_deref());
        return Ok(());
    }

    let output = output.ok_or_else(|| {
        QuireError::PdfError("setting metadata requires an output file (-o)".to_string())
    })?;
    write_file(output, &metadata::apply(&bytes, &edits)?)
}

fn print_field(label: &str, value: Option<&str>) {
    println!("{label}: {}", value.unwrap_or("-"));
}

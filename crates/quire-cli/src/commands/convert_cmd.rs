// SPDX-License-Identifier: MIT
//
// convert — office document to PDF, or PDF to an office format, via the
// configured remote service.

use std::path::{Path, PathBuf};
use std::time::Duration;

use quire_core::config::QuireConfig;
use quire_core::error::{QuireError, Result};
use quire_core::types::InputKind;
use quire_document::HttpOfficeConverter;
use quire_engine::OfficeConverter;
use tracing::info;

use crate::cli::ExportFormat;
use crate::shared::{read_file, write_file};

/// Config file location: `$XDG_CONFIG_HOME/quire/config.json`, falling back
/// to `~/.config/quire/config.json`.
pub fn config_path() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg)
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config")
    } else {
        PathBuf::from(".")
    };
    base.join("quire").join("config.json")
}

pub async fn run(
    input: &Path,
    output: &Path,
    endpoint: Option<String>,
    to: Option<ExportFormat>,
) -> Result<()> {
    let extension = input
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();
    let kind = InputKind::from_extension(&extension).ok_or_else(|| {
        QuireError::Conversion(format!(
            "unrecognised input format '.{extension}' for {}",
            input.display()
        ))
    })?;

    if to.is_some() {
        if !kind.is_native() {
            return Err(QuireError::Conversion(format!(
                "--to exports a PDF input; {} is not a PDF",
                input.display()
            )));
        }
    } else if kind.is_native() {
        return Err(QuireError::Conversion(format!(
            "{} is already PDF-native; pass --to docx or --to pptx to export it",
            input.display()
        )));
    } else if kind.is_image() {
        return Err(QuireError::Conversion(format!(
            "{} is a raster image; use `quire img2pdf` to build a PDF from it",
            input.display()
        )));
    }

    let config = QuireConfig::load_or_default(config_path());
    let converter = match endpoint {
        Some(url) => {
            HttpOfficeConverter::new(url, Duration::from_secs(config.convert_timeout_secs))?
        }
        None => HttpOfficeConverter::from_config(&config)?,
    };

    let bytes = read_file(input)?;
    let result = match to {
        Some(format) => {
            info!(format = ?format, bytes = bytes.len(), "exporting document");
            converter.export(bytes, format.into()).await?
        }
        None => {
            info!(kind = ?kind, bytes = bytes.len(), "converting office document");
            converter.convert(bytes, kind).await?
        }
    };
    write_file(output, &result)
}

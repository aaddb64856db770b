// SPDX-License-Identifier: MIT
//
// ocr — recognise text in rendered page images and print it to stdout.

use std::path::{Path, PathBuf};

use quire_core::error::{QuireError, Result};
use quire_document::{OcrConfig, OcrEngine};
use quire_engine::TextRecognizer;
use tracing::{debug, info};

pub fn run(inputs: &[PathBuf], model_dir: Option<&Path>) -> Result<()> {
    let config = match model_dir {
        Some(dir) => OcrConfig::from_dir(dir),
        None => OcrConfig::default(),
    };
    let engine = OcrEngine::new(config)?;

    for path in inputs {
        let image = image::open(path).map_err(|err| {
            QuireError::ImageError(format!("cannot open {}: {err}", path.display()))
        })?;

        info!(path = %path.display(), "recognising text");
        let mut on_progress = |percent: u8| debug!(percent, "ocr progress");
        let text = engine.recognize(&image, &mut on_progress)?;

        if inputs.len() > 1 {
            println!("--- {} ---", path.display());
        }
        println!("{text}");
    }
    Ok(())
}

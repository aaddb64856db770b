// SPDX-License-Identifier: MIT
//
// OCR — text extraction from rendered page images using the `ocrs` crate, a
// pure-Rust OCR engine backed by neural network models executed via `rten`.
//
// Only available behind the `ocr` feature gate. The engine needs two model
// files, `text-detection.rten` and `text-recognition.rten`, loaded from the
// configured model directory or the ocrs cache (`$XDG_CACHE_HOME/ocrs`,
// falling back to `~/.cache/ocrs`). Running `ocrs-cli` once downloads them.
//
// Note: `ocrs` and `rten` must be compiled in release mode; debug builds are
// orders of magnitude slower.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams};
use quire_core::config::QuireConfig;
use quire_core::error::{QuireError, Result};
use quire_engine::TextRecognizer;
use rten::Model;
use tracing::{debug, info, instrument};

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Locations of the two model files.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrConfig {
    /// Config pointing at a directory expected to contain both model files.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// Config from application configuration: the configured model directory
    /// when set, the ocrs cache otherwise.
    pub fn from_app_config(config: &QuireConfig) -> Self {
        match &config.ocr_model_dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::default(),
        }
    }

    /// Verify both model files exist before attempting the expensive load.
    pub fn validate(&self) -> Result<()> {
        for path in [&self.detection_model_path, &self.recognition_model_path] {
            if !path.exists() {
                return Err(QuireError::OcrError(format!(
                    "OCR model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Text recogniser over rendered page bitmaps.
///
/// Model loading is the expensive step; keep one engine around and feed it
/// every page.
pub struct OcrEngine {
    engine: OcrsEngine,
}

impl OcrEngine {
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: OcrConfig) -> Result<Self> {
        config.validate()?;

        info!("loading OCR models");
        let detection_model = Model::load_file(&config.detection_model_path).map_err(|err| {
            QuireError::OcrError(format!(
                "failed to load detection model from {}: {err}",
                config.detection_model_path.display()
            ))
        })?;
        let recognition_model = Model::load_file(&config.recognition_model_path).map_err(|err| {
            QuireError::OcrError(format!(
                "failed to load recognition model from {}: {err}",
                config.recognition_model_path.display()
            ))
        })?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| QuireError::OcrError(format!("failed to initialise OCR engine: {err}")))?;

        info!("OCR engine ready");
        Ok(Self { engine })
    }

    pub fn from_app_config(config: &QuireConfig) -> Result<Self> {
        Self::new(OcrConfig::from_app_config(config))
    }
}

impl TextRecognizer<DynamicImage> for OcrEngine {
    /// Recognise all text in `bitmap`, reporting progress in percent as each
    /// detected line is decoded.
    #[instrument(skip_all, fields(width = bitmap.width(), height = bitmap.height()))]
    fn recognize(&self, bitmap: &DynamicImage, on_progress: &mut dyn FnMut(u8)) -> Result<String> {
        on_progress(0);

        // ocrs expects RGB8 pixel data.
        let rgb = bitmap.to_rgb8();
        let (width, height) = rgb.dimensions();
        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            QuireError::OcrError(format!("failed to create image source ({width}x{height}): {err}"))
        })?;
        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| QuireError::OcrError(format!("OCR preprocessing failed: {err}")))?;

        let word_rects = self
            .engine
            .detect_words(&input)
            .map_err(|err| QuireError::OcrError(format!("word detection failed: {err}")))?;
        let line_rects = self.engine.find_text_lines(&input, &word_rects);
        debug!(words = word_rects.len(), lines = line_rects.len(), "layout detected");

        if line_rects.is_empty() {
            on_progress(100);
            return Ok(String::new());
        }

        // Decode line by line so callers can surface incremental progress.
        let total = line_rects.len();
        let mut lines = Vec::with_capacity(total);
        for (index, line) in line_rects.iter().enumerate() {
            let decoded = self
                .engine
                .recognize_text(&input, std::slice::from_ref(line))
                .map_err(|err| QuireError::OcrError(format!("line recognition failed: {err}")))?;
            for text_line in decoded.iter().flatten() {
                let text = text_line.to_string();
                if !text.trim().is_empty() {
                    lines.push(text);
                }
            }
            on_progress(((index + 1) * 100 / total) as u8);
        }

        debug!(recognized_lines = lines.len(), "OCR complete");
        Ok(lines.join("\n"))
    }
}

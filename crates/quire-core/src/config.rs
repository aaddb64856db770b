// SPDX-License-Identifier: MIT
//
// Toolbox configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Persistent toolbox settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuireConfig {
    /// Endpoint of the remote office-format conversion service.
    pub convert_endpoint: Option<String>,
    /// Timeout for a single conversion request, in seconds.
    pub convert_timeout_secs: u64,
    /// Directory containing OCR model files (None = default cache dir).
    pub ocr_model_dir: Option<String>,
}

impl Default for QuireConfig {
    fn default() -> Self {
        Self {
            convert_endpoint: None,
            convert_timeout_secs: 120,
            ocr_model_dir: None,
        }
    }
}

impl QuireConfig {
    /// Load a config from a JSON file, falling back to defaults if the file
    /// is missing or unreadable.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        std::fs::read_to_string(path.as_ref())
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default()
    }

    /// Persist the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

// SPDX-License-Identifier: MIT
//
// Remote office conversion — turn Word/Excel/PowerPoint bytes into PDF via
// an HTTP conversion service.
//
// Office container formats are not parsed locally; the configured endpoint
// receives the file as a multipart upload and responds with PDF bytes. The
// service contract is deliberately thin so any LibreOffice-backed converter
// (e.g. a Gotenberg instance) can stand behind the endpoint.

use std::time::Duration;

use quire_core::config::QuireConfig;
use quire_core::error::{QuireError, Result};
use quire_core::types::{ExportKind, InputKind};
use quire_engine::OfficeConverter;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info, instrument};

/// Converter backed by a remote HTTP service.
#[derive(Debug, Clone)]
pub struct HttpOfficeConverter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpOfficeConverter {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| QuireError::Conversion(format!("cannot build HTTP client: {err}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Build a converter from configuration. Fails when no conversion
    /// endpoint is configured.
    pub fn from_config(config: &QuireConfig) -> Result<Self> {
        let endpoint = config.convert_endpoint.clone().ok_or_else(|| {
            QuireError::Conversion(
                "no conversion endpoint configured; set convert_endpoint in the config file"
                    .to_string(),
            )
        })?;
        Self::new(endpoint, Duration::from_secs(config.convert_timeout_secs))
    }

    fn upload_name(kind: InputKind) -> &'static str {
        match kind {
            InputKind::Word => "document.docx",
            InputKind::Spreadsheet => "document.xlsx",
            InputKind::Presentation => "document.pptx",
            _ => "document.bin",
        }
    }

    async fn post_form(&self, form: Form) -> Result<Vec<u8>> {
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|err| QuireError::Conversion(format!("conversion request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QuireError::Conversion(format!(
                "conversion service returned {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let reply = response
            .bytes()
            .await
            .map_err(|err| QuireError::Conversion(format!("cannot read conversion reply: {err}")))?;
        Ok(reply.to_vec())
    }
}

impl OfficeConverter for HttpOfficeConverter {
    #[instrument(skip_all, fields(kind = ?kind, bytes_len = bytes.len(), endpoint = %self.endpoint))]
    async fn convert(&self, bytes: Vec<u8>, kind: InputKind) -> Result<Vec<u8>> {
        if kind.is_native() {
            return Err(QuireError::Conversion(format!(
                "{kind:?} input does not need office conversion"
            )));
        }

        info!("uploading document for conversion");

        let part = Part::bytes(bytes)
            .file_name(Self::upload_name(kind))
            .mime_str(kind.mime_type())
            .map_err(|err| QuireError::Conversion(format!("invalid upload mime type: {err}")))?;
        let form = Form::new().part("file", part);

        let pdf = self.post_form(form).await?;
        debug!(output_bytes = pdf.len(), "conversion complete");
        Ok(pdf)
    }

    #[instrument(skip_all, fields(kind = ?kind, bytes_len = bytes.len(), endpoint = %self.endpoint))]
    async fn export(&self, bytes: Vec<u8>, kind: ExportKind) -> Result<Vec<u8>> {
        info!("uploading document for export");

        let part = Part::bytes(bytes)
            .file_name("document.pdf")
            .mime_str(InputKind::Pdf.mime_type())
            .map_err(|err| QuireError::Conversion(format!("invalid upload mime type: {err}")))?;
        // The service picks the output format from the `format` field; the
        // file part itself is always the native document.
        let form = Form::new()
            .part("file", part)
            .text("format", kind.extension());

        let exported = self.post_form(form).await?;
        debug!(output_bytes = exported.len(), "export complete");
        Ok(exported)
    }
}

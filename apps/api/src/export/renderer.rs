use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::config::ExportConfig;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The rendering service could not be reached in time.
    #[error("renderer unavailable: {0}")]
    Unavailable(String),
    /// The service was reached but did not produce a PDF.
    #[error("render failed: {0}")]
    Failed(String),
}

/// Turns a preview URL into PDF bytes.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<Bytes, RenderError>;
}

/// Renderer backed by an external headless-browser service that accepts
/// `POST {"url": ...}` and answers with `application/pdf`.
pub struct HttpPdfRenderer {
    client: Client,
    endpoint: String,
}

impl HttpPdfRenderer {
    pub fn new(config: &ExportConfig) -> Result<Self, RenderError> {
        let client = Client::builder()
            .timeout(config.pdf_timeout)
            .build()
            .map_err(|e| RenderError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.pdf_service_url.clone(),
        })
    }
}

#[async_trait]
impl PdfRenderer for HttpPdfRenderer {
    async fn render(&self, url: &str) -> Result<Bytes, RenderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "url": url }))
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RenderError::Failed(format!("status {status}: {body}")));
        }

        let pdf = response.bytes().await.map_err(classify)?;
        debug!("Rendered {url} ({} bytes)", pdf.len());
        Ok(pdf)
    }
}

fn classify(err: reqwest::Error) -> RenderError {
    if err.is_connect() || err.is_timeout() {
        RenderError::Unavailable(err.to_string())
    } else {
        RenderError::Failed(err.to_string())
    }
}

//! LLM Client: the single point of entry for all completion calls.
//!
//! ARCHITECTURAL RULE: No other module may call the model endpoint directly.
//! Everything goes through the `LlmGateway` trait so tests can swap in a stub.
//!
//! The gateway only moves text. It never parses model output and never
//! invents a response; callers decide what a failure means for them.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::LlmConfig;

pub mod prompts;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// A text-completion capability: prompt and model in, unstructured text out.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, GatewayError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<SamplingOptions>,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct SamplingOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Gateway backed by an Ollama-compatible `/api/generate` endpoint.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    endpoint: String,
    options: Option<SamplingOptions>,
    max_retries: u32,
}

impl OllamaClient {
    pub fn new(config: &LlmConfig) -> Result<Self, GatewayError> {
        let options = match (config.temperature, config.max_tokens) {
            (None, None) => None,
            (temperature, num_predict) => Some(SamplingOptions {
                temperature,
                num_predict,
            }),
        };

        Ok(Self {
            client: Client::builder().timeout(config.timeout).build()?,
            endpoint: format!("{}/api/generate", config.base_url),
            options,
            max_retries: config.max_retries,
        })
    }

    async fn send_once(&self, body: &GenerateRequest<'_>) -> Result<String, GatewayError> {
        let response = self.client.post(&self.endpoint).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw = response.text().await?;
        Ok(response_text(&raw))
    }
}

#[async_trait]
impl LlmGateway for OllamaClient {
    /// Non-streaming completion. Retries on 429, 5xx and transport errors with
    /// exponential backoff when `max_retries` allows it.
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, GatewayError> {
        let body = GenerateRequest {
            model,
            prompt,
            stream: false,
            options: self.options,
        };

        let text = with_retries(self.max_retries, || self.send_once(&body)).await?;
        debug!(
            "LLM call succeeded: model={model}, prompt_chars={}, response_chars={}",
            prompt.len(),
            text.len()
        );
        Ok(text)
    }
}

/// Runs `attempt` until it succeeds, fails with a non-retryable error, or
/// `max_retries` extra attempts are spent.
async fn with_retries<F, Fut>(max_retries: u32, mut attempt: F) -> Result<String, GatewayError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, GatewayError>>,
{
    let mut retries = 0;
    loop {
        match attempt().await {
            Ok(text) => return Ok(text),
            Err(err) if retries < max_retries && is_retryable(&err) => {
                // Exponential backoff: 1s, 2s, 4s
                let delay = Duration::from_millis(1000 * (1 << retries.min(5)));
                warn!(
                    "LLM call attempt {} failed ({err}), retrying after {}ms...",
                    retries + 1,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                retries += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

fn is_retryable(err: &GatewayError) -> bool {
    match err {
        GatewayError::Http(_) => true,
        GatewayError::Api { status, .. } => *status == 429 || *status >= 500,
    }
}

/// Pulls the `response` text field out of an endpoint reply.
/// Any other shape is an empty completion, not an error.
fn response_text(raw: &str) -> String {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|v| v.get("response").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_default()
}

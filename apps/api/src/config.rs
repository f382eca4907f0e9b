use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::sync::Semaphore;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub api_prefix: String,
    pub cors_allowed_origins: Vec<String>,
    pub llm: LlmConfig,
    pub review: ReviewConfig,
    pub export: ExportConfig,
}

/// Everything the completion gateway needs to reach the model endpoint.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub default_model: String,
    pub timeout: Duration,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub max_retries: u32,
}

/// How section scores roll up into the final result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScoringMode {
    /// Plain mean of section scores, no `categories` block.
    #[default]
    Mean,
    /// Mean overall score plus per-category weighted averages.
    Weighted,
}

#[derive(Debug, Clone)]
pub struct ReviewConfig {
    pub default_model: String,
    pub scoring_mode: ScoringMode,
    /// Upper bound on section analyses in flight for a single request.
    pub concurrency: usize,
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub client_base_url: String,
    pub token_ttl: Duration,
    pub pdf_service_url: String,
    pub pdf_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let api_prefix = env.or("API_PREFIX", "/api");
        if !api_prefix.starts_with('/') || api_prefix.len() < 2 {
            bail!("API_PREFIX must start with '/' and name a path, got '{api_prefix}'");
        }
        let api_prefix = api_prefix.trim_end_matches('/').to_string();

        let default_model = env.or("OLLAMA_MODEL", "gemma3:4b");

        let scoring_mode = match env.or("REVIEW_SCORING_MODE", "mean").to_lowercase().as_str() {
            "mean" => ScoringMode::Mean,
            "weighted" => ScoringMode::Weighted,
            other => bail!("REVIEW_SCORING_MODE must be 'mean' or 'weighted', got '{other}'"),
        };

        let concurrency: usize = env.parse_or("REVIEW_CONCURRENCY", 4)?;
        if concurrency == 0 || concurrency > Semaphore::MAX_PERMITS {
            bail!(
                "REVIEW_CONCURRENCY must be between 1 and {}, got {concurrency}",
                Semaphore::MAX_PERMITS
            );
        }

        Ok(Config {
            port: env.parse_or("PORT", 8000)?,
            rust_log: env.or("RUST_LOG", "info"),
            api_prefix,
            cors_allowed_origins: split_csv(&env.or("CORS_ALLOWED_ORIGINS", "")),
            llm: LlmConfig {
                base_url: env
                    .or("OLLAMA_URL", "http://localhost:11434")
                    .trim_end_matches('/')
                    .to_string(),
                default_model: default_model.clone(),
                timeout: Duration::from_secs(env.parse_or("LLM_TIMEOUT_SECS", 120)?),
                temperature: env.parse_opt("LLM_TEMPERATURE")?,
                max_tokens: env.parse_opt("LLM_MAX_TOKENS")?,
                max_retries: env.parse_or("LLM_MAX_RETRIES", 0)?,
            },
            review: ReviewConfig {
                default_model,
                scoring_mode,
                concurrency,
            },
            export: ExportConfig {
                client_base_url: env
                    .require("CLIENT_BASE_URL")?
                    .trim_end_matches('/')
                    .to_string(),
                token_ttl: Duration::from_secs(env.parse_or("TOKEN_TTL_SECONDS", 300)?),
                pdf_service_url: env.or("PDF_SERVICE_URL", "http://127.0.0.1:3001/generate-pdf"),
                pdf_timeout: Duration::from_secs(env.parse_or("PDF_TIMEOUT_SECS", 60)?),
            },
        })
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn require(&self, key: &str) -> Result<String> {
        self.get(key)
            .with_context(|| format!("Required environment variable '{key}' is not set"))
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        Ok(self.parse_opt(key)?.unwrap_or(default))
    }

    fn parse_opt<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.get(key)
            .map(|raw| {
                raw.trim()
                    .parse::<T>()
                    .with_context(|| format!("{key} has an invalid value '{raw}'"))
            })
            .transpose()
    }
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

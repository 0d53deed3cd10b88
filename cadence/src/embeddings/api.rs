//! HTTP client for an OpenAI-compatible `/embeddings` endpoint.
//!
//! Transient failures (connection errors, 5xx, 429) are retried with
//! exponential backoff up to `max_retries`; auth failures and malformed
//! requests abort immediately.

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, StatusCode,
};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::error::{CadenceError, Result};

/// Base URL for each provider the model string can name.
pub fn default_base_url(provider: &str) -> &'static str {
    match provider.to_lowercase().as_str() {
        "openrouter" => "https://openrouter.ai/api/v1",
        "ollama" => "http://localhost:11434/v1",
        "lmstudio" => "http://localhost:1234/v1",
        _ => "https://api.openai.com/v1",
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsBody {
    data: Vec<EmbeddingRow>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
}

/// Whether a failed attempt is worth repeating.
enum Attempt {
    Retry(CadenceError),
    Fatal(CadenceError),
}

#[derive(Clone)]
pub struct EmbeddingApiClient {
    http: Client,
    config: ApiConfig,
    headers: HeaderMap,
}

impl EmbeddingApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CadenceError::Embedding(format!("Failed to create HTTP client: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| CadenceError::Embedding(format!("Invalid API key header: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(Self {
            http,
            config,
            headers,
        })
    }

    pub async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.config.base_url);
        let payload = json!({ "model": self.config.model, "input": texts });

        let mut last_error = None;
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tokio::time::sleep(backoff(attempt)).await;
            }

            match self.attempt(&url, &payload, texts.len()).await {
                Ok(vectors) => return Ok(vectors),
                Err(Attempt::Retry(e)) => last_error = Some(e),
                Err(Attempt::Fatal(e)) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| CadenceError::Embedding("Unknown error".to_string())))
    }

    async fn attempt(
        &self,
        url: &str,
        payload: &serde_json::Value,
        expected: usize,
    ) -> std::result::Result<Vec<Vec<f32>>, Attempt> {
        let response = self
            .http
            .post(url)
            .headers(self.headers.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| Attempt::Retry(CadenceError::Embedding(format!("Request failed: {e}"))))?;

        let status = response.status();

        if status.is_success() {
            let body: EmbeddingsBody = response.json().await.map_err(|e| {
                Attempt::Fatal(CadenceError::Embedding(format!(
                    "Failed to parse response: {e}"
                )))
            })?;
            if body.data.len() != expected {
                return Err(Attempt::Fatal(CadenceError::Embedding(format!(
                    "Provider returned {} embeddings for {} inputs",
                    body.data.len(),
                    expected
                ))));
            }
            return Ok(body.data.into_iter().map(|row| row.embedding).collect());
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());
            return Err(Attempt::Retry(CadenceError::ApiRateLimit { retry_after }));
        }

        let detail = response.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Attempt::Fatal(CadenceError::ApiAuth(detail)));
        }

        let error = CadenceError::Embedding(format!("API error {status}: {detail}"));
        if status.is_server_error() {
            Err(Attempt::Retry(error))
        } else {
            Err(Attempt::Fatal(error))
        }
    }
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(100 * 2_u64.pow(attempt.saturating_sub(1)))
}

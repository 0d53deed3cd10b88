use async_trait::async_trait;

use crate::config::{parse_provider_model, EmbeddingsConfig};
use crate::error::{CadenceError, Result};

use super::api::{default_base_url, ApiConfig, EmbeddingApiClient};

/// Seam for text embedding. The production implementation calls a remote
/// OpenAI-compatible provider; tests substitute a deterministic in-process
/// embedder. Vector length must be constant for a given deployment.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    fn dimensions(&self) -> usize;
}

pub struct EmbeddingProvider {
    client: EmbeddingApiClient,
    model: String,
    dimensions: usize,
}

impl EmbeddingProvider {
    pub fn new(config: &EmbeddingsConfig) -> Result<Self> {
        let (provider, model_name) = parse_provider_model(&config.model);

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(provider).to_string());

        let client = EmbeddingApiClient::new(ApiConfig {
            base_url,
            api_key: config.api_key.clone(),
            model: model_name.to_string(),
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
        })?;

        Ok(Self {
            client,
            model: config.model.clone(),
            dimensions: config.dimensions,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for EmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(CadenceError::Validation(
                "Cannot embed empty text".to_string(),
            ));
        }

        let mut vectors = self.client.embed(&[text]).await?;
        let vector = vectors
            .pop()
            .ok_or_else(|| CadenceError::Embedding("Provider returned no embedding".to_string()))?;

        if vector.len() != self.dimensions {
            return Err(CadenceError::Embedding(format!(
                "Provider returned {} dimensions, expected {}",
                vector.len(),
                self.dimensions
            )));
        }

        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

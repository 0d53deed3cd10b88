//! Shared fixtures for the integration tests: a deterministic in-process
//! embedder and service/state builders wired to an in-memory database.

use std::sync::Arc;

use async_trait::async_trait;

use cadence::api::AppState;
use cadence::config::{Config, DatabaseConfig, EmbeddingsConfig, InsightsConfig, ServerConfig};
use cadence::db::{Database, DatabaseBackend, LibSqlBackend};
use cadence::embeddings::Embedder;
use cadence::error::Result;

pub const TEST_DIMENSIONS: usize = 16;

/// Deterministic embedder: a hashed bag-of-words vector. Identical texts
/// embed identically and word overlap raises cosine similarity, which is
/// all the retrieval tests need.
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new() -> Self {
        Self {
            dimensions: TEST_DIMENSIONS,
        }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimensions];
        for word in text.to_lowercase().split_whitespace() {
            let mut hash: u64 = 0xcbf29ce484222325;
            for byte in word.bytes() {
                hash ^= byte as u64;
                hash = hash.wrapping_mul(0x100000001b3);
            }
            vector[(hash % self.dimensions as u64) as usize] += 1.0;
        }
        if vector.iter().all(|v| *v == 0.0) {
            vector[0] = 1.0;
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

pub fn test_config(api_keys: Vec<String>) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            api_keys,
        },
        database: DatabaseConfig {
            url: ":memory:".to_string(),
            auth_token: None,
            local_path: None,
        },
        embeddings: EmbeddingsConfig {
            model: "openai/text-embedding-3-small".to_string(),
            dimensions: TEST_DIMENSIONS,
            api_key: None,
            base_url: None,
            timeout_secs: 5,
            max_retries: 1,
            max_input_chars: 8000,
        },
        insights: InsightsConfig {
            similarity_threshold: 0.7,
            retrieval_limit: 5,
            insight_window_days: 30,
            trend_window_days: 14,
            trend_dead_zone: 2.0,
            high_score_threshold: 80.0,
            min_app_entries: 3,
            min_focus_entries: 3,
            confidence_cap: 10,
            default_focus_secs: 1800,
        },
    }
}

pub async fn test_backend() -> Arc<dyn DatabaseBackend> {
    let db = Database::new(&test_config(vec![]).database).await.unwrap();
    Arc::new(LibSqlBackend::new(db))
}

pub async fn test_state(api_keys: Vec<String>) -> AppState {
    let config = test_config(api_keys);
    let db = test_backend().await;
    let embedder: Arc<dyn Embedder> = Arc::new(HashEmbedder::new());
    AppState::new(config, db, embedder)
}

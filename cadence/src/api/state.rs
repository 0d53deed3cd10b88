use std::sync::Arc;

use crate::config::Config;
use crate::db::DatabaseBackend;
use crate::embeddings::Embedder;
use crate::services::{InsightService, MemoryService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn DatabaseBackend>,
    pub embedder: Arc<dyn Embedder>,
    pub memory: Arc<MemoryService>,
    pub insights: Arc<InsightService>,
}

impl AppState {
    /// Wire the services from their explicit dependencies. Everything built
    /// here is constructed once at startup and shared via `Arc`.
    pub fn new(config: Config, db: Arc<dyn DatabaseBackend>, embedder: Arc<dyn Embedder>) -> Self {
        let config = Arc::new(config);
        let memory = Arc::new(MemoryService::new(
            db.clone(),
            embedder.clone(),
            config.insights.clone(),
            config.embeddings.max_input_chars,
        ));
        let insights = Arc::new(InsightService::new(db.clone(), config.insights.clone()));

        Self {
            config,
            db,
            embedder,
            memory,
            insights,
        }
    }
}

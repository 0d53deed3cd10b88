use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::connection::Database;
use crate::db::repository::MemoryRepository;
use crate::db::traits::{DatabaseBackend, MemoryStore, MetadataStore};
use crate::db::MetaRepository;
use crate::error::Result;
use crate::models::{MemoryEntry, MemorySearchHit};

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MemoryStore for LibSqlBackend {
    async fn create_entry(&self, entry: &MemoryEntry, embedding: &[f32]) -> Result<()> {
        let conn = self.db.connect()?;
        MemoryRepository::create(&conn, entry, embedding).await
    }

    async fn get_entry_by_id(&self, id: &str) -> Result<Option<MemoryEntry>> {
        let conn = self.db.connect()?;
        MemoryRepository::get_by_id(&conn, id).await
    }

    async fn search_similar_entries(
        &self,
        user_id: &str,
        query: &[f32],
        limit: u32,
        threshold: f32,
    ) -> Result<Vec<MemorySearchHit>> {
        let conn = self.db.connect()?;
        MemoryRepository::search_similar(&conn, user_id, query, limit, threshold).await
    }

    async fn get_history_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<MemoryEntry>> {
        let conn = self.db.connect()?;
        MemoryRepository::history_since(&conn, user_id, since).await
    }
}

#[async_trait]
impl MetadataStore for LibSqlBackend {
    async fn get_embedding_dimensions(&self) -> Result<Option<usize>> {
        let conn = self.db.connect()?;
        MetaRepository::get_embedding_dimensions(&conn).await
    }

    async fn set_embedding_dimensions(&self, dims: usize) -> Result<()> {
        let conn = self.db.connect()?;
        MetaRepository::set_embedding_dimensions(&conn, dims).await
    }
}

#[async_trait]
impl DatabaseBackend for LibSqlBackend {
    async fn sync(&self) -> Result<()> {
        // Local SQLite needs no replication sync; a connect doubles as a
        // reachability probe for the health endpoint.
        let _conn = self.db.connect()?;
        Ok(())
    }
}

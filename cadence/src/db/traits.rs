use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{MemoryEntry, MemorySearchHit};

/// Read/write operations over the append-only memory log.
///
/// Entries are immutable once created; corrections insert a new entry. All
/// reads are scoped to a single `user_id`.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Persist one entry together with its embedding. Atomic: the entry
    /// either lands complete or not at all.
    async fn create_entry(&self, entry: &MemoryEntry, embedding: &[f32]) -> Result<()>;

    async fn get_entry_by_id(&self, id: &str) -> Result<Option<MemoryEntry>>;

    /// Entries for `user_id` with cosine similarity to `query` at or above
    /// `threshold`, ordered by similarity descending, then `created_at`
    /// descending, truncated to `limit`. Entries whose stored vector cannot
    /// be compared to the query are excluded.
    async fn search_similar_entries(
        &self,
        user_id: &str,
        query: &[f32],
        limit: u32,
        threshold: f32,
    ) -> Result<Vec<MemorySearchHit>>;

    /// All entries for `user_id` with `created_at >= since`, oldest first.
    async fn get_history_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<MemoryEntry>>;
}

/// Key-value metadata store (e.g. embedding dimensions).
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn get_embedding_dimensions(&self) -> Result<Option<usize>>;
    async fn set_embedding_dimensions(&self, dims: usize) -> Result<()>;
}

/// A complete database backend: all store traits plus lifecycle operations.
#[async_trait]
pub trait DatabaseBackend: MemoryStore + MetadataStore {
    /// Sync with remote (e.g. Turso replication). No-op for local-only backends.
    async fn sync(&self) -> Result<()>;
}

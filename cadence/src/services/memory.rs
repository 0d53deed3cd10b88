use std::sync::Arc;

use chrono::Utc;
use nanoid::nanoid;

use crate::config::InsightsConfig;
use crate::db::DatabaseBackend;
use crate::embeddings::Embedder;
use crate::error::{CadenceError, Result};
use crate::models::{MemoryDraft, MemoryEntry, MemorySearchHit, TimeContext};

/// Store and retrieval operations over the memory log. Construction takes
/// the backend and embedder as explicit dependencies; there is no shared
/// module state.
pub struct MemoryService {
    db: Arc<dyn DatabaseBackend>,
    embedder: Arc<dyn Embedder>,
    insights: InsightsConfig,
    max_input_chars: usize,
}

impl MemoryService {
    pub fn new(
        db: Arc<dyn DatabaseBackend>,
        embedder: Arc<dyn Embedder>,
        insights: InsightsConfig,
        max_input_chars: usize,
    ) -> Self {
        Self {
            db,
            embedder,
            insights,
            max_input_chars,
        }
    }

    /// Embed the draft's summary and persist the full entry.
    ///
    /// All-or-nothing: an embedding or write failure leaves nothing stored.
    /// Embedding failures surface to the caller so the summary pipeline can
    /// decide whether to drop or retry.
    pub async fn store_memory(&self, draft: MemoryDraft) -> Result<MemoryEntry> {
        if draft.summary_text.trim().is_empty() {
            return Err(CadenceError::Validation(
                "Summary text cannot be empty".to_string(),
            ));
        }

        let embedding = self
            .embedder
            .embed(truncate_chars(&draft.summary_text, self.max_input_chars))
            .await?;

        let now = Utc::now();
        let entry = MemoryEntry {
            id: nanoid!(),
            user_id: draft.user_id,
            session_id: draft.session_id,
            summary_text: draft.summary_text,
            memory_type: draft.memory_type,
            productivity_score: draft.productivity_score.map(|s| s.clamp(0.0, 100.0)),
            app_context: Default::default(),
            primary_app: None,
            time_context: TimeContext::from_datetime(now),
            created_at: now,
        }
        .with_app_context(draft.app_context);

        self.db
            .create_entry(&entry, &embedding)
            .await
            .map_err(|e| match e {
                CadenceError::Database(err) => CadenceError::Persistence(err.to_string()),
                other => other,
            })?;

        tracing::debug!(entry_id = %entry.id, user_id = %entry.user_id, "Stored memory entry");
        Ok(entry)
    }

    /// Semantically similar past entries for prompt context.
    ///
    /// Best-effort: retrieval enriches a downstream prompt but is never a
    /// hard dependency, so embedding or query failures degrade to an empty
    /// list and are only logged.
    pub async fn retrieve_context(
        &self,
        query_text: &str,
        user_id: &str,
        limit: Option<u32>,
    ) -> Vec<MemorySearchHit> {
        let limit = limit.unwrap_or(self.insights.retrieval_limit);

        let query = match self
            .embedder
            .embed(truncate_chars(query_text, self.max_input_chars))
            .await
        {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!(error = %e, "Context retrieval skipped: embedding failed");
                return Vec::new();
            }
        };

        match self
            .db
            .search_similar_entries(user_id, &query, limit, self.insights.similarity_threshold)
            .await
        {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(error = %e, "Context retrieval skipped: similarity query failed");
                Vec::new()
            }
        }
    }

    pub async fn get_entry(&self, id: &str) -> Result<Option<MemoryEntry>> {
        self.db.get_entry_by_id(id).await
    }
}

/// Truncate to at most `max_chars` characters without splitting a code point.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, LibSqlBackend};
    use crate::models::AppSeconds;
    use async_trait::async_trait;

    struct StubEmbedder {
        vector: Vec<f32>,
    }

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(self.vector.clone())
        }

        fn dimensions(&self) -> usize {
            self.vector.len()
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(CadenceError::Embedding("provider down".to_string()))
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    fn insights_config() -> InsightsConfig {
        InsightsConfig {
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
        }
    }

    async fn test_backend() -> Arc<dyn DatabaseBackend> {
        let db = Database::new(&crate::config::DatabaseConfig {
            url: ":memory:".to_string(),
            auth_token: None,
            local_path: None,
        })
        .await
        .unwrap();
        Arc::new(LibSqlBackend::new(db))
    }

    fn service(db: Arc<dyn DatabaseBackend>, embedder: Arc<dyn Embedder>) -> MemoryService {
        MemoryService::new(db, embedder, insights_config(), 8000)
    }

    fn draft(user_id: &str, text: &str) -> MemoryDraft {
        MemoryDraft {
            user_id: user_id.to_string(),
            session_id: None,
            summary_text: text.to_string(),
            memory_type: Default::default(),
            productivity_score: Some(82.0),
            app_context: AppSeconds::new(),
        }
    }

    #[tokio::test]
    async fn test_store_then_history_round_trip() {
        let db = test_backend().await;
        let svc = service(
            db.clone(),
            Arc::new(StubEmbedder {
                vector: vec![1.0, 0.0, 0.0],
            }),
        );

        let mut d = draft("user1", "Deep work on the compiler frontend");
        d.session_id = Some("sess-9".to_string());
        let stored = svc.store_memory(d).await.unwrap();

        let since = Utc::now() - chrono::Duration::hours(1);
        let history = db.get_history_since("user1", since).await.unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, stored.id);
        assert_eq!(history[0].summary_text, "Deep work on the compiler frontend");
        assert_eq!(history[0].session_id.as_deref(), Some("sess-9"));
        assert_eq!(history[0].productivity_score, Some(82.0));
    }

    #[tokio::test]
    async fn test_store_rejects_empty_summary() {
        let db = test_backend().await;
        let svc = service(
            db,
            Arc::new(StubEmbedder {
                vector: vec![1.0, 0.0, 0.0],
            }),
        );

        let err = svc.store_memory(draft("user1", "   ")).await.unwrap_err();
        assert!(matches!(err, CadenceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_store_embedding_failure_stores_nothing() {
        let db = test_backend().await;
        let svc = service(db.clone(), Arc::new(FailingEmbedder));

        let err = svc
            .store_memory(draft("user1", "some summary"))
            .await
            .unwrap_err();
        assert!(matches!(err, CadenceError::Embedding(_)));

        let since = Utc::now() - chrono::Duration::hours(1);
        assert!(db.get_history_since("user1", since).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_clamps_out_of_range_score() {
        let db = test_backend().await;
        let svc = service(
            db,
            Arc::new(StubEmbedder {
                vector: vec![1.0, 0.0, 0.0],
            }),
        );

        let mut d = draft("user1", "text");
        d.productivity_score = Some(140.0);
        let stored = svc.store_memory(d).await.unwrap();
        assert_eq!(stored.productivity_score, Some(100.0));
    }

    #[tokio::test]
    async fn test_store_derives_primary_app() {
        let db = test_backend().await;
        let svc = service(
            db,
            Arc::new(StubEmbedder {
                vector: vec![1.0, 0.0, 0.0],
            }),
        );

        let mut d = draft("user1", "text");
        d.app_context.insert("editor".to_string(), 2400);
        d.app_context.insert("browser".to_string(), 300);
        let stored = svc.store_memory(d).await.unwrap();
        assert_eq!(stored.primary_app.as_deref(), Some("editor"));
    }

    #[tokio::test]
    async fn test_retrieve_context_returns_similar_entries() {
        let db = test_backend().await;
        let svc = service(
            db,
            Arc::new(StubEmbedder {
                vector: vec![1.0, 0.0, 0.0],
            }),
        );

        svc.store_memory(draft("user1", "Worked on billing reconciliation"))
            .await
            .unwrap();

        let hits = svc.retrieve_context("billing work", "user1", None).await;
        assert_eq!(hits.len(), 1);
        assert!(hits[0].similarity >= 0.7);
    }

    #[tokio::test]
    async fn test_retrieve_context_is_user_scoped() {
        let db = test_backend().await;
        let svc = service(
            db,
            Arc::new(StubEmbedder {
                vector: vec![1.0, 0.0, 0.0],
            }),
        );

        svc.store_memory(draft("someone-else", "Their summary"))
            .await
            .unwrap();

        assert!(svc.retrieve_context("query", "user1", None).await.is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_context_degrades_on_embedding_failure() {
        let db = test_backend().await;

        let seeder = service(
            db.clone(),
            Arc::new(StubEmbedder {
                vector: vec![1.0, 0.0, 0.0],
            }),
        );
        seeder.store_memory(draft("user1", "text")).await.unwrap();

        let svc = service(db, Arc::new(FailingEmbedder));
        assert!(svc.retrieve_context("query", "user1", None).await.is_empty());
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // multi-byte characters are not split
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use libsql::{params, Connection};

use crate::embeddings::similarity::{clamp_unit, cosine_similarity};
use crate::error::Result;
use crate::models::{MemoryEntry, MemorySearchHit, TimeContext};

const ENTRY_COLUMNS: &str = "id, user_id, session_id, summary_text, memory_type, \
     productivity_score, app_context, primary_app, hour_of_day, day_of_week, \
     local_date, created_at";

pub struct MemoryRepository;

impl MemoryRepository {
    /// Insert one entry together with its embedding in a single statement.
    /// The row either lands complete or not at all.
    pub async fn create(conn: &Connection, entry: &MemoryEntry, embedding: &[f32]) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO memories (
                id, user_id, session_id, summary_text, memory_type,
                productivity_score, app_context, primary_app, hour_of_day,
                day_of_week, local_date, embedding, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13
            )
            "#,
            params![
                entry.id.clone(),
                entry.user_id.clone(),
                entry.session_id.clone(),
                entry.summary_text.clone(),
                entry.memory_type.to_string(),
                entry.productivity_score,
                serde_json::to_string(&entry.app_context)?,
                entry.primary_app.clone(),
                entry.time_context.hour as i64,
                entry.time_context.day_of_week as i64,
                entry.time_context.date.format("%Y-%m-%d").to_string(),
                embedding_to_blob(embedding),
                entry.created_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn get_by_id(conn: &Connection, id: &str) -> Result<Option<MemoryEntry>> {
        let mut rows = conn
            .query(
                &format!("SELECT {ENTRY_COLUMNS} FROM memories WHERE id = ?1"),
                params![id],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_entry(&row)?))
        } else {
            Ok(None)
        }
    }

    /// Linear-scan similarity query over one user's vectors.
    ///
    /// Scores are cosine similarity clamped to `[0, 1]`; rows whose stored
    /// vector cannot be compared to the query (length mismatch from an older
    /// embedding model, zero magnitude) are skipped. Results are ordered by
    /// similarity descending with `created_at` descending as the tie-break,
    /// and truncated to `limit`.
    pub async fn search_similar(
        conn: &Connection,
        user_id: &str,
        query: &[f32],
        limit: u32,
        threshold: f32,
    ) -> Result<Vec<MemorySearchHit>> {
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {ENTRY_COLUMNS}, embedding FROM memories \
                     WHERE user_id = ?1 AND embedding IS NOT NULL"
                ),
                params![user_id],
            )
            .await?;

        let mut hits = Vec::new();
        while let Some(row) = rows.next().await? {
            let entry = Self::row_to_entry(&row)?;
            let stored = blob_to_embedding(&row.get::<Vec<u8>>(12)?);

            let similarity = match cosine_similarity(query, &stored) {
                Some(score) => clamp_unit(score),
                None => {
                    tracing::debug!(entry_id = %entry.id, "Skipping entry with incomparable embedding");
                    continue;
                }
            };

            if similarity >= threshold {
                hits.push(MemorySearchHit { entry, similarity });
            }
        }

        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.entry.created_at.cmp(&a.entry.created_at))
        });
        hits.truncate(limit as usize);

        Ok(hits)
    }

    /// All entries for a user with `created_at >= since`, oldest first.
    /// The analyzers rely on this chronological ordering.
    pub async fn history_since(
        conn: &Connection,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<MemoryEntry>> {
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {ENTRY_COLUMNS} FROM memories \
                     WHERE user_id = ?1 AND created_at >= ?2 \
                     ORDER BY created_at ASC"
                ),
                params![user_id, since.to_rfc3339()],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_entry(&row)?);
        }

        Ok(results)
    }

    pub fn row_to_entry(row: &libsql::Row) -> Result<MemoryEntry> {
        let created_at = DateTime::parse_from_rfc3339(&row.get::<String>(11)?)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        let date = NaiveDate::parse_from_str(&row.get::<String>(10)?, "%Y-%m-%d")
            .unwrap_or_else(|_| created_at.date_naive());

        Ok(MemoryEntry {
            id: row.get(0)?,
            user_id: row.get(1)?,
            session_id: row.get(2)?,
            summary_text: row.get(3)?,
            memory_type: row.get::<String>(4)?.parse().unwrap_or_default(),
            productivity_score: row.get(5)?,
            app_context: serde_json::from_str(&row.get::<String>(6)?).unwrap_or_default(),
            primary_app: row.get(7)?,
            time_context: TimeContext {
                hour: row.get::<i64>(8)? as u32,
                day_of_week: row.get::<i64>(9)? as u32,
                date,
                timestamp: created_at,
            },
            created_at,
        })
    }
}

/// Encode an embedding as a little-endian f32 BLOB.
pub fn embedding_to_blob(vector: &[f32]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(vector.len() * 4);
    for value in vector {
        blob.extend_from_slice(&value.to_le_bytes());
    }
    blob
}

/// Decode a little-endian f32 BLOB back into an embedding.
pub fn blob_to_embedding(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

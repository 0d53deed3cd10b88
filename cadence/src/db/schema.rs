use libsql::Connection;

use crate::error::Result;

pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Memory entries: append-only, one row per generated summary.
        -- Rows are never updated; corrections insert a new entry.
        CREATE TABLE IF NOT EXISTS memories (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            session_id TEXT,
            summary_text TEXT NOT NULL,
            memory_type TEXT NOT NULL DEFAULT 'interval',
            productivity_score REAL,
            app_context TEXT NOT NULL DEFAULT '{}',
            primary_app TEXT,
            hour_of_day INTEGER NOT NULL,
            day_of_week INTEGER NOT NULL,
            local_date TEXT NOT NULL,
            embedding BLOB,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_memories_user_id ON memories(user_id);
        CREATE INDEX IF NOT EXISTS idx_memories_created_at ON memories(created_at);
        -- Compound index for the history scans the analyzers run
        CREATE INDEX IF NOT EXISTS idx_memories_user_created
            ON memories(user_id, created_at);

        -- Metadata key-value store
        CREATE TABLE IF NOT EXISTS cadence_meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .await?;

    Ok(())
}

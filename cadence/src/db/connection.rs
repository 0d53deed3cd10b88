use libsql::{Builder, Connection};
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::error::Result;

use super::schema;

/// Handle to the underlying libsql database. Opens local files, `:memory:`,
/// remote Turso URLs, and embedded replicas, then applies pragmas and the
/// schema once at startup.
pub struct Database {
    pub(crate) db: Arc<libsql::Database>,
    pub(crate) busy_timeout_ms: u64,
    pub(crate) journal_mode: String,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let database = Self {
            db: Arc::new(open(config).await?),
            busy_timeout_ms: std::env::var("DATABASE_BUSY_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            journal_mode: normalize_journal_mode(
                &std::env::var("DATABASE_JOURNAL_MODE").unwrap_or_default(),
            )
            .to_string(),
        };

        let conn = database.connect()?;
        database.apply_pragmas(&conn).await;
        schema::init_schema(&conn).await?;

        Ok(database)
    }

    pub fn connect(&self) -> Result<Connection> {
        Ok(self.db.connect()?)
    }

    /// Pragma failures are logged, not fatal: remote backends reject some of
    /// them and the defaults are workable.
    async fn apply_pragmas(&self, conn: &Connection) {
        let pragmas = [
            ("busy_timeout", self.busy_timeout_ms.to_string()),
            ("journal_mode", self.journal_mode.clone()),
        ];
        for (name, value) in pragmas {
            let sql = format!("PRAGMA {name} = {value}");
            if let Err(error) = conn.execute_batch(&sql).await {
                tracing::warn!(pragma = name, value = %value, error = %error, "pragma not applied");
            }
        }
    }
}

async fn open(config: &DatabaseConfig) -> Result<libsql::Database> {
    let url = config.url.as_str();

    if url.starts_with("libsql://") || url.starts_with("https://") {
        let token = config.auth_token.clone().unwrap_or_default();
        let db = match &config.local_path {
            // Embedded replica: local reads, remote writes.
            Some(replica) => {
                Builder::new_remote_replica(replica, url.to_string(), token)
                    .build()
                    .await?
            }
            None => Builder::new_remote(url.to_string(), token).build().await?,
        };
        return Ok(db);
    }

    let path = if url == ":memory:" {
        url
    } else {
        url.strip_prefix("file:").unwrap_or(url)
    };
    Ok(Builder::new_local(path).build().await?)
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode.clone(),
        }
    }
}

fn normalize_journal_mode(value: &str) -> &'static str {
    match value.trim().to_uppercase().as_str() {
        "DELETE" => "DELETE",
        "TRUNCATE" => "TRUNCATE",
        "PERSIST" => "PERSIST",
        "MEMORY" => "MEMORY",
        "OFF" => "OFF",
        _ => "WAL",
    }
}

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::{primary_app, AppSeconds, MemoryType};

/// Hour/day/date coordinates derived from a timestamp at write time.
///
/// Day-of-week is 0–6 with 0 = Monday.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeContext {
    pub hour: u32,
    pub day_of_week: u32,
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
}

impl TimeContext {
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self {
            hour: dt.hour(),
            day_of_week: dt.weekday().num_days_from_monday(),
            date: dt.date_naive(),
            timestamp: dt,
        }
    }
}

/// One persisted, immutable unit of personalized history: the summary text,
/// its embedding context, and the structured metadata the analyzers read.
/// Entries are only ever appended — corrections insert a new entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub id: String,
    pub user_id: String,
    pub session_id: Option<String>,
    pub summary_text: String,
    pub memory_type: MemoryType,
    /// 0–100; absent when the upstream summary was malformed.
    pub productivity_score: Option<f64>,
    pub app_context: AppSeconds,
    pub primary_app: Option<String>,
    pub time_context: TimeContext,
    pub created_at: DateTime<Utc>,
}

impl MemoryEntry {
    pub fn new(id: String, user_id: String, summary_text: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            session_id: None,
            summary_text,
            memory_type: MemoryType::default(),
            productivity_score: None,
            app_context: AppSeconds::new(),
            primary_app: None,
            time_context: TimeContext::from_datetime(now),
            created_at: now,
        }
    }

    /// Total seconds of tracked application use for this entry.
    pub fn total_app_seconds(&self) -> u64 {
        self.app_context.values().sum()
    }

    /// Recompute the derived `primary_app` from `app_context`.
    pub fn with_app_context(mut self, app_context: AppSeconds) -> Self {
        self.primary_app = primary_app(&app_context);
        self.app_context = app_context;
        self
    }
}

/// Draft accepted by the store operation; everything derived (id, time
/// context, primary app, embedding) is filled in at write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryDraft {
    pub user_id: String,
    pub session_id: Option<String>,
    pub summary_text: String,
    pub memory_type: MemoryType,
    pub productivity_score: Option<f64>,
    pub app_context: AppSeconds,
}

/// A stored entry plus its similarity to a query vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySearchHit {
    pub entry: MemoryEntry,
    pub similarity: f32,
}

//! Memory request/response DTOs for the v1 API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::common::V1MemoryType;
use crate::intelligence::extract_completed_tasks;
use crate::models;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Request body for `POST /v1/memories`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemoryRequest {
    /// Owner of the memory. All retrieval is scoped to this user.
    pub user_id: String,
    /// Originating work session, if any. A weak back-reference only.
    pub session_id: Option<String>,
    /// The summary text to embed and store.
    pub summary_text: String,
    /// Memory granularity. Defaults to `interval`.
    pub memory_type: Option<V1MemoryType>,
    /// Productivity score 0–100. Absent when the upstream summary was
    /// malformed.
    pub productivity_score: Option<f64>,
    /// Application name to seconds of foreground use.
    #[serde(default)]
    pub app_context: HashMap<String, u64>,
}

impl From<CreateMemoryRequest> for models::MemoryDraft {
    fn from(req: CreateMemoryRequest) -> Self {
        Self {
            user_id: req.user_id,
            session_id: req.session_id,
            summary_text: req.summary_text,
            memory_type: req
                .memory_type
                .map(Into::into)
                .unwrap_or_default(),
            productivity_score: req.productivity_score,
            app_context: req.app_context,
        }
    }
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// Time coordinates derived at write time.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeContextResponse {
    /// Hour of day, 0–23.
    pub hour: u32,
    /// Day of week, 0–6 with 0 = Monday.
    pub day_of_week: u32,
    /// Calendar date.
    #[schema(value_type = String)]
    pub date: NaiveDate,
    #[schema(value_type = String)]
    pub timestamp: DateTime<Utc>,
}

impl From<models::TimeContext> for TimeContextResponse {
    fn from(ctx: models::TimeContext) -> Self {
        Self {
            hour: ctx.hour,
            day_of_week: ctx.day_of_week,
            date: ctx.date,
            timestamp: ctx.timestamp,
        }
    }
}

/// Full memory response for `POST /v1/memories` and
/// `GET /v1/memories/{memoryId}`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemoryResponse {
    /// Unique memory ID (nanoid, 21 chars).
    pub memory_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub summary_text: String,
    pub memory_type: V1MemoryType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub productivity_score: Option<f64>,
    /// Application name to seconds of foreground use.
    pub app_context: HashMap<String, u64>,
    /// Application with the highest usage in this entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_app: Option<String>,
    pub time_context: TimeContextResponse,
    /// Completed-task phrases extracted from the summary prose.
    pub completed_tasks: Vec<String>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl From<models::MemoryEntry> for MemoryResponse {
    fn from(entry: models::MemoryEntry) -> Self {
        let completed_tasks = extract_completed_tasks(&entry.summary_text);
        Self {
            memory_id: entry.id,
            user_id: entry.user_id,
            session_id: entry.session_id,
            summary_text: entry.summary_text,
            memory_type: entry.memory_type.into(),
            productivity_score: entry.productivity_score,
            app_context: entry.app_context,
            primary_app: entry.primary_app,
            time_context: entry.time_context.into(),
            completed_tasks,
            created_at: entry.created_at,
        }
    }
}

use serde::{Deserialize, Serialize};

/// The four pattern analyses the insight engine can produce.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    TimeOfDay,
    Trend,
    AppUsage,
    FocusDuration,
}

impl std::fmt::Display for InsightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TimeOfDay => write!(f, "time_of_day"),
            Self::Trend => write!(f, "trend"),
            Self::AppUsage => write!(f, "app_usage"),
            Self::FocusDuration => write!(f, "focus_duration"),
        }
    }
}

/// A derived, ephemeral analysis result. Never persisted — recomputed from
/// the full eligible history window on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternInsight {
    pub insight_type: InsightType,
    /// Human-readable statement for the dashboard card.
    pub insight: String,
    /// 0–1, rises with supporting sample count, capped at 1.
    pub confidence: f64,
    /// Raw numbers backing the statement, for programmatic consumers.
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Declining,
    Stable,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Increasing => write!(f, "increasing"),
            Self::Declining => write!(f, "declining"),
            Self::Stable => write!(f, "stable"),
        }
    }
}

/// Mean productivity score for one calendar (ISO) week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeekBucket {
    /// Stable bucket key, e.g. `2026-W31`.
    pub week: String,
    pub mean: f64,
}

/// Week-over-week comparison of mean productivity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    pub current: f64,
    pub previous: f64,
    pub direction: TrendDirection,
    /// `|current - previous| / previous * 100`, 0 when `previous` is 0.
    pub percentage: f64,
    pub weeks: Vec<WeekBucket>,
}

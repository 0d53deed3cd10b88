//! Insight and trend DTOs for the v1 API.

use serde::{Deserialize, Serialize};

use crate::models::{self, InsightType, TrendDirection};

/// Query parameters for `GET /v1/users/{userId}/insights`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
pub struct InsightsQuery {
    /// History window in days (default 30).
    pub days: Option<u32>,
}

/// Query parameters for `GET /v1/users/{userId}/trend`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
pub struct TrendQuery {
    /// History window in days (default 14).
    pub days: Option<u32>,
}

/// One derived pattern insight.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightResponse {
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    /// Human-readable statement for the dashboard card.
    pub insight: String,
    /// 0–1, rises with supporting sample count.
    pub confidence: f64,
    /// Raw numbers backing the statement.
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

impl From<models::PatternInsight> for InsightResponse {
    fn from(insight: models::PatternInsight) -> Self {
        Self {
            insight_type: insight.insight_type,
            insight: insight.insight,
            confidence: insight.confidence,
            data: insight.data,
        }
    }
}

/// Insight list wrapper. Empty when the user has too little history for any
/// analysis to emit a result.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub insights: Vec<InsightResponse>,
}

/// Mean productivity score for one ISO week.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekBucketResponse {
    /// Stable bucket key, e.g. `2026-W31`.
    pub week: String,
    pub mean: f64,
}

/// Week-over-week trend report for `GET /v1/users/{userId}/trend`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendResponse {
    /// Latest week's mean score.
    pub current: f64,
    /// The week before (or `current` when only one week exists).
    pub previous: f64,
    pub direction: TrendDirection,
    /// Percent change relative to `previous`, 0 when `previous` is 0.
    pub percentage: f64,
    pub weeks: Vec<WeekBucketResponse>,
}

impl From<models::TrendReport> for TrendResponse {
    fn from(report: models::TrendReport) -> Self {
        Self {
            current: report.current,
            previous: report.previous,
            direction: report.direction,
            percentage: report.percentage,
            weeks: report
                .weeks
                .into_iter()
                .map(|bucket| WeekBucketResponse {
                    week: bucket.week,
                    mean: bucket.mean,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insight_response_uses_type_key_on_the_wire() {
        let resp = InsightResponse {
            insight_type: InsightType::TimeOfDay,
            insight: "You are most productive around 9:00".to_string(),
            confidence: 0.4,
            data: serde_json::json!({"bestHour": 9}),
        };
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["type"], "time_of_day");
        assert!(json.get("insightType").is_none());
    }

    #[test]
    fn trend_response_from_report() {
        let report = models::TrendReport {
            current: 75.0,
            previous: 70.0,
            direction: TrendDirection::Increasing,
            percentage: 7.14,
            weeks: vec![models::WeekBucket {
                week: "2026-W31".to_string(),
                mean: 75.0,
            }],
        };
        let resp = TrendResponse::from(report);
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["direction"], "increasing");
        assert_eq!(json["weeks"][0]["week"], "2026-W31");
    }
}

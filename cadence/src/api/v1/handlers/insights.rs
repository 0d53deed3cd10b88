//! v1 Insight and trend handlers.

use axum::extract::{Path, Query, State};

use crate::api::v1::dto::{
    InsightResponse, InsightsQuery, InsightsResponse, TrendQuery, TrendResponse,
};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;

/// `GET /api/v1/users/{userId}/insights`
///
/// Recomputed from the history window on every call. Too little history
/// simply yields fewer (possibly zero) insights.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/insights",
    tag = "insights",
    operation_id = "insights.list",
    params(
        ("userId" = String, Path, description = "User ID"),
        InsightsQuery,
    ),
    responses(
        (status = 200, description = "Pattern insights, possibly empty", body = InsightsResponse),
    )
)]
pub async fn get_user_insights(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<InsightsQuery>,
) -> ApiResponse<InsightsResponse> {
    if user_id.trim().is_empty() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "userId cannot be empty");
    }

    match state.insights.get_insights(&user_id, query.days).await {
        Ok(insights) => ApiResponse::success(InsightsResponse {
            insights: insights.into_iter().map(InsightResponse::from).collect(),
        }),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/users/{userId}/trend`
///
/// Returns `data: null` when the window holds no scored entries.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/trend",
    tag = "insights",
    operation_id = "insights.trend",
    params(
        ("userId" = String, Path, description = "User ID"),
        TrendQuery,
    ),
    responses(
        (status = 200, description = "Trend report, or null without data", body = Option<TrendResponse>),
    )
)]
pub async fn get_user_trend(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<TrendQuery>,
) -> ApiResponse<Option<TrendResponse>> {
    if user_id.trim().is_empty() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "userId cannot be empty");
    }

    match state.insights.get_trend(&user_id, query.days).await {
        Ok(report) => ApiResponse::success(report.map(TrendResponse::from)),
        Err(e) => e.into(),
    }
}

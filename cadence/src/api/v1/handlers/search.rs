//! v1 Search handler.

use axum::extract::State;

use crate::api::v1::dto::{SearchRequest, SearchResponse, SearchResultItem};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode, ResponseMeta};
use crate::api::AppState;

/// `POST /api/v1/search`
///
/// Retrieval is advisory context for a downstream prompt: embedding or query
/// failures degrade to an empty result list rather than an error, so this
/// endpoint only fails on invalid input.
#[utoipa::path(
    post,
    path = "/api/v1/search",
    tag = "search",
    operation_id = "search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Similar memories, possibly empty", body = SearchResponse),
        (status = 400, description = "Invalid request", body = ApiError),
    )
)]
pub async fn search(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<SearchRequest>,
) -> ApiResponse<SearchResponse> {
    if req.q.trim().is_empty() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "q cannot be empty");
    }

    if req.user_id.trim().is_empty() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "userId cannot be empty");
    }

    let hits = state
        .memory
        .retrieve_context(&req.q, &req.user_id, req.limit)
        .await;

    let results: Vec<SearchResultItem> = hits.into_iter().map(Into::into).collect();
    let meta = ResponseMeta {
        total: Some(results.len() as u64),
    };

    ApiResponse::success_with_meta(SearchResponse { results }, meta)
}

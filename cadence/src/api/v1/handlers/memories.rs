//! v1 Memory handlers.

use axum::extract::{Path, State};

use crate::api::v1::dto::{CreateMemoryRequest, MemoryResponse};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;

/// `POST /api/v1/memories`
#[utoipa::path(
    post,
    path = "/api/v1/memories",
    tag = "memories",
    operation_id = "memories.create",
    request_body = CreateMemoryRequest,
    responses(
        (status = 201, description = "Memory stored", body = MemoryResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 502, description = "Embedding provider failed", body = ApiError),
    )
)]
pub async fn create_memory(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<CreateMemoryRequest>,
) -> ApiResponse<MemoryResponse> {
    if req.user_id.trim().is_empty() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "userId cannot be empty");
    }

    if req.summary_text.trim().is_empty() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "summaryText cannot be empty");
    }

    match state.memory.store_memory(req.into()).await {
        Ok(entry) => ApiResponse::created(MemoryResponse::from(entry)),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/memories/{memoryId}`
#[utoipa::path(
    get,
    path = "/api/v1/memories/{memoryId}",
    tag = "memories",
    operation_id = "memories.get",
    params(("memoryId" = String, Path, description = "Memory ID")),
    responses(
        (status = 200, description = "Memory found", body = MemoryResponse),
        (status = 404, description = "Memory not found", body = ApiError),
    )
)]
pub async fn get_memory(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResponse<MemoryResponse> {
    match state.memory.get_entry(&id).await {
        Ok(Some(entry)) => ApiResponse::success(MemoryResponse::from(entry)),
        Ok(None) => ApiResponse::error(ErrorCode::NotFound, format!("Memory {id} not found")),
        Err(e) => e.into(),
    }
}

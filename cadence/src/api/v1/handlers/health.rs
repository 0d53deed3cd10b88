use axum::extract::State;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::v1::response::ApiResponse;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub database: DatabaseStatus,
    pub embeddings: EmbeddingsStatus,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DatabaseStatus {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct EmbeddingsStatus {
    pub model: String,
    pub dimensions: usize,
}

/// `GET /api/v1/health`
///
/// Always 200; component trouble shows up in the per-component status
/// fields rather than the HTTP code, so dashboards can render partial
/// degradation.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthData> {
    let database = DatabaseStatus {
        status: if state.db.sync().await.is_ok() {
            "ok".to_string()
        } else {
            "error".to_string()
        },
    };

    ApiResponse::success(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        embeddings: EmbeddingsStatus {
            model: state.config.embeddings.model.clone(),
            dimensions: state.embedder.dimensions(),
        },
    })
}

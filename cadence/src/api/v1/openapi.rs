use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cadence API",
        version = "1.0.0",
        description = "Self-hostable AI memory and pattern-insight engine for productivity tracking.",
    ),
    paths(
        handlers::health::health_check,
        handlers::memories::create_memory,
        handlers::memories::get_memory,
        handlers::search::search,
        handlers::insights::get_user_insights,
        handlers::insights::get_user_trend,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        response::ResponseMeta,
        // Common
        dto::common::V1MemoryType,
        // Memories
        dto::memories::CreateMemoryRequest,
        dto::memories::MemoryResponse,
        dto::memories::TimeContextResponse,
        // Search
        dto::search::SearchRequest,
        dto::search::SearchResponse,
        dto::search::SearchResultItem,
        // Insights
        dto::insights::InsightsQuery,
        dto::insights::TrendQuery,
        dto::insights::InsightResponse,
        dto::insights::InsightsResponse,
        dto::insights::TrendResponse,
        dto::insights::WeekBucketResponse,
        crate::models::InsightType,
        crate::models::TrendDirection,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::DatabaseStatus,
        handlers::health::EmbeddingsStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "memories", description = "Memory storage and lookup"),
        (name = "search", description = "Similarity retrieval over a user's memories"),
        (name = "insights", description = "Derived pattern insights and productivity trend"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

        openapi
            .components
            .get_or_insert_with(Default::default)
            .add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
    }
}

/// `GET /api/v1/openapi.json`
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Redoc UI mounted at `/docs`.
pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;
use super::middleware::v1_auth_middleware;

pub fn v1_router(state: AppState) -> Router<AppState> {
    let memories = Router::new()
        .route("/", post(handlers::memories::create_memory))
        .route("/{memoryId}", get(handlers::memories::get_memory));

    let search = Router::new().route("/", post(handlers::search::search));

    let users = Router::new()
        .route("/{userId}/insights", get(handlers::insights::get_user_insights))
        .route("/{userId}/trend", get(handlers::insights::get_user_trend));

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router());

    let protected_routes = Router::new()
        .nest("/memories", memories)
        .nest("/search", search)
        .nest("/users", users)
        .route_layer(middleware::from_fn_with_state(state, v1_auth_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}

//! Bearer-token gate in front of the protected v1 routes.
//!
//! Keys come from `CADENCE_API_KEYS`. With no keys configured the server
//! still starts (so `/health` and the docs stay reachable) but every
//! protected route answers 401. Rejections use the same JSON envelope as
//! the handlers, never a bare status code.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::state::AppState;

use super::response::{ApiResponse, ErrorCode};

const BEARER_PREFIX: &str = "Bearer ";

fn bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or("Missing authorization header")?;
    let value = header
        .to_str()
        .map_err(|_| "Invalid authorization header format. Expected: Bearer <token>")?;
    value
        .strip_prefix(BEARER_PREFIX)
        .ok_or("Invalid authorization header format. Expected: Bearer <token>")
}

fn reject(message: &str) -> Response {
    ApiResponse::<()>::error(ErrorCode::Unauthorized, message).into_response()
}

pub async fn v1_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let keys = &state.config.server.api_keys;
    if keys.is_empty() {
        return reject("API keys not configured. Set CADENCE_API_KEYS to enable access.");
    }

    match bearer_token(request.headers()) {
        Ok(token) if keys.iter().any(|k| k == token) => next.run(request).await,
        Ok(_) => reject("Invalid API key"),
        Err(why) => reject(why),
    }
}

//! Wire envelope shared by every v1 endpoint.
//!
//! Success carries `data` (plus optional `meta`), failure carries `error`
//! with a machine-readable code:
//!
//! ```json
//! { "data": { ... }, "meta": { "total": 3 } }
//! { "error": { "code": "not_found", "message": "Memory abc not found" } }
//! ```
//!
//! The two halves are mutually exclusive; `data: null` is a legitimate
//! success payload (the trend endpoint uses it for "no data yet").

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::CadenceError;

/// Error classification carried in the `error.code` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed or failed-validation request. HTTP 400.
    InvalidRequest,
    /// Missing or rejected credentials. HTTP 401.
    Unauthorized,
    /// No such resource. HTTP 404.
    NotFound,
    /// The embedding provider failed or was unreachable. HTTP 502.
    UpstreamError,
    /// Anything else. The real cause is logged server-side only. HTTP 500.
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::UpstreamError => "upstream_error",
            Self::InternalError => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::UpstreamError => StatusCode::BAD_GATEWAY,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `error` object of a failed response. `message` is always safe to show
/// to an end user; internal causes stay in the server log.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

/// List-response enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// The envelope itself. Constructors fix the HTTP status; the status field
/// never reaches the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    fn with_status(status: StatusCode, data: Option<T>, meta: Option<ResponseMeta>) -> Self {
        Self {
            data,
            meta,
            error: None,
            status,
        }
    }

    /// HTTP 200 with a payload.
    pub fn success(data: T) -> Self {
        Self::with_status(StatusCode::OK, Some(data), None)
    }

    /// HTTP 200 with a payload and list metadata.
    pub fn success_with_meta(data: T, meta: ResponseMeta) -> Self {
        Self::with_status(StatusCode::OK, Some(data), Some(meta))
    }

    /// HTTP 201 after a write.
    pub fn created(data: T) -> Self {
        Self::with_status(StatusCode::CREATED, Some(data), None)
    }

    /// Failure; the status comes from the code.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            data: None,
            meta: None,
            error: Some(ApiError {
                code: code.clone(),
                message: message.into(),
            }),
            status: code.status(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        match serde_json::to_value(&self) {
            Ok(body) => (status, Json(body)).into_response(),
            // A payload that cannot serialize is a server bug; degrade to a
            // minimal hand-built envelope rather than an empty body.
            Err(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": {
                        "code": ErrorCode::InternalError.as_str(),
                        "message": "An internal error occurred"
                    }
                })),
            )
                .into_response(),
        }
    }
}

impl<T: Serialize> From<CadenceError> for ApiResponse<T> {
    /// Map a domain error onto the wire contract. Validation and not-found
    /// messages pass through; everything else is replaced with a generic
    /// message and logged, so database paths, provider URLs, and key material
    /// never leave the process.
    fn from(err: CadenceError) -> Self {
        let (code, message) = match &err {
            CadenceError::NotFound(msg) => (ErrorCode::NotFound, msg.clone()),
            CadenceError::Validation(msg) => (ErrorCode::InvalidRequest, msg.clone()),
            CadenceError::Json(e) => (ErrorCode::InvalidRequest, format!("Invalid JSON: {e}")),
            CadenceError::ApiAuth(_) => {
                (ErrorCode::Unauthorized, "Authentication required".to_string())
            }
            CadenceError::ApiRateLimit { retry_after } => {
                let message = match retry_after {
                    Some(secs) => {
                        format!("Embedding provider rate limit, retry after {secs} seconds")
                    }
                    None => "Embedding provider rate limit".to_string(),
                };
                (ErrorCode::UpstreamError, message)
            }
            CadenceError::Embedding(_) | CadenceError::Http(_) => {
                tracing::error!(error = %err, "embedding provider failure surfaced to v1");
                (
                    ErrorCode::UpstreamError,
                    "Embedding provider unavailable".to_string(),
                )
            }
            CadenceError::Database(_)
            | CadenceError::Persistence(_)
            | CadenceError::Io(_)
            | CadenceError::Internal(_) => {
                tracing::error!(error = %err, "internal failure surfaced to v1");
                (
                    ErrorCode::InternalError,
                    "An internal error occurred".to_string(),
                )
            }
        };

        ApiResponse::error(code, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_json<T: Serialize>(resp: &ApiResponse<T>) -> serde_json::Value {
        serde_json::to_value(resp).expect("envelope serializes")
    }

    #[test]
    fn success_half_omits_error_half() {
        let json = as_json(&ApiResponse::success(7));
        assert_eq!(json["data"], 7);
        assert!(json.get("error").is_none());
        assert!(json.get("meta").is_none());
    }

    #[test]
    fn error_half_omits_data_half() {
        let json = as_json(&ApiResponse::<()>::error(ErrorCode::NotFound, "gone"));
        assert!(json.get("data").is_none());
        assert_eq!(json["error"]["code"], "not_found");
        assert_eq!(json["error"]["message"], "gone");
    }

    #[test]
    fn meta_total_rides_along_with_lists() {
        let resp =
            ApiResponse::success_with_meta(vec!["a", "b"], ResponseMeta { total: Some(2) });
        let json = as_json(&resp);
        assert_eq!(json["meta"]["total"], 2);
        assert_eq!(json["data"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn explicit_null_data_survives_serialization() {
        // get_trend with no history: success(None) must produce `data: null`,
        // not an envelope with the key missing.
        let json = as_json(&ApiResponse::success(None::<u32>));
        assert!(json.as_object().unwrap().contains_key("data"));
        assert!(json["data"].is_null());
    }

    #[test]
    fn each_code_fixes_its_status_and_wire_string() {
        let cases = [
            (ErrorCode::InvalidRequest, StatusCode::BAD_REQUEST, "invalid_request"),
            (ErrorCode::Unauthorized, StatusCode::UNAUTHORIZED, "unauthorized"),
            (ErrorCode::NotFound, StatusCode::NOT_FOUND, "not_found"),
            (ErrorCode::UpstreamError, StatusCode::BAD_GATEWAY, "upstream_error"),
            (
                ErrorCode::InternalError,
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
            ),
        ];
        for (code, status, wire) in cases {
            assert_eq!(code.status(), status);
            assert_eq!(code.as_str(), wire);
            assert_eq!(serde_json::to_value(&code).unwrap(), wire);
        }
    }

    #[test]
    fn created_uses_201() {
        assert_eq!(ApiResponse::created("row").status, StatusCode::CREATED);
    }

    #[test]
    fn validation_errors_pass_their_message_through() {
        let resp: ApiResponse<()> =
            CadenceError::Validation("summaryText cannot be empty".into()).into();
        let err = resp.error.unwrap();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert_eq!(err.message, "summaryText cannot be empty");
    }

    #[test]
    fn embedding_failures_map_upstream_and_hide_details() {
        let resp: ApiResponse<()> =
            CadenceError::Embedding("POST https://internal:9999 refused".into()).into();
        let err = resp.error.unwrap();
        assert_eq!(err.code, ErrorCode::UpstreamError);
        assert!(!err.message.contains("internal:9999"));
    }

    #[test]
    fn persistence_failures_map_internal_and_hide_details() {
        let resp: ApiResponse<()> = CadenceError::Persistence("/var/db full".into()).into();
        let err = resp.error.unwrap();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.message, "An internal error occurred");
    }

    #[test]
    fn rate_limit_keeps_the_retry_hint() {
        let resp: ApiResponse<()> = CadenceError::ApiRateLimit {
            retry_after: Some(12),
        }
        .into();
        let err = resp.error.unwrap();
        assert_eq!(err.code, ErrorCode::UpstreamError);
        assert!(err.message.contains("12"));
    }
}

//! API error mapping.
//!
//! Validation problems come back as a 422 carrying the full collected
//! list; store and geodata failures surface with their raw message on a
//! 502, matching the no-retry design — the client shows the error and
//! the user tries again.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use vigia_core::Issue;

/// Errors a handler can produce.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The submission failed its checks; nothing was written.
    #[error("validation failed")]
    Validation(Vec<Issue>),

    /// The path named a form that does not exist.
    #[error("unknown form: {0}")]
    UnknownForm(String),

    /// No row carries the requested uid.
    #[error("{0}")]
    NotFound(String),

    /// The request was malformed beyond validation.
    #[error("{0}")]
    BadRequest(String),

    /// The spreadsheet API failed; raw message attached.
    #[error("store error: {0}")]
    Store(String),

    /// A geodata host failed; raw message attached.
    #[error("geodata error: {0}")]
    Geo(String),

    /// Artifact generation failed.
    #[error("artifact error: {0}")]
    Artifact(String),
}

impl From<vigia_core::Error> for ApiError {
    fn from(err: vigia_core::Error) -> Self {
        match err {
            vigia_core::Error::Validation { issues } => ApiError::Validation(issues),
            vigia_core::Error::UnknownForm(slug) => ApiError::UnknownForm(slug),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<vigia_sheets::Error> for ApiError {
    fn from(err: vigia_sheets::Error) -> Self {
        match err {
            vigia_sheets::Error::Core(core) => core.into(),
            not_found @ vigia_sheets::Error::UidNotFound { .. } => {
                ApiError::NotFound(not_found.to_string())
            }
            other => ApiError::Store(other.to_string()),
        }
    }
}

impl From<vigia_geo::Error> for ApiError {
    fn from(err: vigia_geo::Error) -> Self {
        ApiError::Geo(err.to_string())
    }
}

impl From<vigia_pareto::Error> for ApiError {
    fn from(err: vigia_pareto::Error) -> Self {
        ApiError::Artifact(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(issues) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "errors": issues }),
            ),
            ApiError::UnknownForm(slug) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("unknown form: {slug}") }),
            ),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            ApiError::Store(message) | ApiError::Geo(message) => {
                tracing::error!("upstream failure: {message}");
                (StatusCode::BAD_GATEWAY, json!({ "error": message }))
            }
            ApiError::Artifact(message) => {
                tracing::error!("artifact failure: {message}");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_422() {
        let resp = ApiError::Validation(vec![Issue::general("x")]).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_store_maps_to_502() {
        let resp = ApiError::Store("quota".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_uid_not_found_maps_to_404() {
        let err: ApiError = vigia_sheets::Error::UidNotFound {
            worksheet: "Prueba_1".into(),
            uid: "abc".into(),
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_core_validation_passes_through_store_error() {
        let core = vigia_core::Error::validation(vec![Issue::general("bad")]);
        let err: ApiError = vigia_sheets::Error::Core(core).into();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}

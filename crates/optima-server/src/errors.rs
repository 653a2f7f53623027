//! The JSON error envelope.
//!
//! Every failure leaves the server as
//! `{"error": {"code": "...", "message": "..."}}` with a matching HTTP
//! status. Domain errors from the service crates map in via `From`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use optima_artifacts::ArtifactError;
use optima_auth::AuthError;
use optima_llm::ProviderError;
use optima_media::MediaError;
use optima_store::StoreError;

/// Route-level errors with a stable code and HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or unusable request (400).
    #[error("{0}")]
    InvalidParams(String),

    /// Bad credentials (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Missing resource (404).
    #[error("{0}")]
    NotFound(String),

    /// Wrong method on a known path (405).
    #[error("method not allowed")]
    MethodNotAllowed,

    /// An upstream vendor failed (502).
    #[error("{0}")]
    Upstream(String),

    /// Everything else (500).
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidParams(_) => "INVALID_PARAMS",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::Upstream(_) => "UPSTREAM_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidParams(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        });
        (self.status(), Json(body)).into_response()
    }
}

impl From<ArtifactError> for ApiError {
    fn from(err: ArtifactError) -> Self {
        match err {
            ArtifactError::UnknownKind { .. } => Self::InvalidParams(err.to_string()),
            ArtifactError::NotFound { .. } => Self::NotFound(err.to_string()),
            ArtifactError::Provider(e) => e.into(),
            ArtifactError::Store(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UserNotFound => Self::NotFound(err.to_string()),
            AuthError::InvalidToken => Self::InvalidParams(err.to_string()),
            AuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthError::Email(_) => Self::Upstream(err.to_string()),
            AuthError::Hash(_) | AuthError::Jwt(_) => Self::Internal(err.to_string()),
            AuthError::Store(e) => e.into(),
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::UnknownProvider { .. } | ProviderError::NotConfigured { .. } => {
                Self::InvalidParams(err.to_string())
            }
            _ => Self::Upstream(err.to_string()),
        }
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::InvalidInput { .. } => Self::InvalidParams(err.to_string()),
            MediaError::NotConfigured { .. } => Self::Internal(err.to_string()),
            MediaError::Http(_) | MediaError::Api { .. } => Self::Upstream(err.to_string()),
            MediaError::Provider(e) => e.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_code_pairing() {
        let cases = [
            (ApiError::InvalidParams("x".into()), 400, "INVALID_PARAMS"),
            (ApiError::Unauthorized("x".into()), 401, "UNAUTHORIZED"),
            (ApiError::NotFound("x".into()), 404, "NOT_FOUND"),
            (ApiError::MethodNotAllowed, 405, "METHOD_NOT_ALLOWED"),
            (ApiError::Upstream("x".into()), 502, "UPSTREAM_ERROR"),
            (ApiError::Internal("x".into()), 500, "INTERNAL_ERROR"),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status().as_u16(), status);
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn unknown_kind_maps_to_400() {
        let err: ApiError = ArtifactError::UnknownKind {
            kind: "hologram".into(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_user_maps_to_404() {
        let err: ApiError = AuthError::UserNotFound.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_token_maps_to_400() {
        let err: ApiError = AuthError::InvalidToken.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn provider_api_error_maps_to_502() {
        let err: ApiError = ProviderError::Api {
            status: 500,
            message: "down".into(),
            code: None,
            retryable: true,
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn unknown_provider_maps_to_400() {
        let err: ApiError = ProviderError::UnknownProvider {
            name: "grok".into(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}

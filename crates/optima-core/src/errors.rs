//! Shared error vocabulary.
//!
//! [`OptimaError`] is the cross-crate error surface: each variant carries a
//! stable code string that route handlers map onto an HTTP status and JSON
//! error envelope. Crate-local error enums convert into it at the boundary.

use thiserror::Error;

/// Top-level error categories shared across crates.
#[derive(Debug, Error)]
pub enum OptimaError {
    /// Request body or parameters are missing/invalid.
    #[error("invalid params: {message}")]
    InvalidParams {
        /// Human-readable description.
        message: String,
    },

    /// The referenced entity does not exist.
    #[error("not found: {message}")]
    NotFound {
        /// Human-readable description.
        message: String,
    },

    /// Authentication or token validation failed.
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// Human-readable description.
        message: String,
    },

    /// An upstream service (model vendor, email, media API) failed.
    #[error("upstream failure: {message}")]
    Upstream {
        /// Human-readable description.
        message: String,
    },

    /// Unexpected internal failure.
    #[error("internal error: {message}")]
    Internal {
        /// Human-readable description.
        message: String,
    },
}

impl OptimaError {
    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidParams { .. } => "INVALID_PARAMS",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Shorthand for an invalid-params error.
    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
        }
    }

    /// Shorthand for a not-found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Shorthand for an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

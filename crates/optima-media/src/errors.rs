//! Media errors.

use thiserror::Error;

/// Result alias for media operations.
pub type Result<T> = std::result::Result<T, MediaError>;

/// Errors from the video-assistant backends.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The request payload was unusable (empty text, bad base64, too big).
    #[error("invalid input: {message}")]
    InvalidInput {
        /// What was wrong.
        message: String,
    },

    /// The backend has no API key configured.
    #[error("not configured: {message}")]
    NotConfigured {
        /// Which backend and what is missing.
        message: String,
    },

    /// Transport-level failure.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The vendor rejected the call.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code (0 for in-band errors on a 200).
        status: u16,
        /// Vendor error message.
        message: String,
    },

    /// Script generation failed at the model.
    #[error(transparent)]
    Provider(#[from] optima_llm::ProviderError),
}

impl MediaError {
    /// Shorthand for an invalid-input error.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

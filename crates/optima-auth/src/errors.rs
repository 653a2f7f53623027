//! Auth errors.

use thiserror::Error;

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors from credential and reset-token operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No account with the given email.
    #[error("no account for that email")]
    UserNotFound,

    /// Wrong password for an existing account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The reset token is invalid, expired, or already used.
    ///
    /// One variant for all three on purpose: callers must not be able to
    /// distinguish a forged token from a replayed one.
    #[error("invalid or expired reset token")]
    InvalidToken,

    /// Password hashing or verification failed.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// Token signing failed (bad secret or claims).
    #[error("token signing failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Email could not be built or sent.
    #[error("email delivery failed: {0}")]
    Email(String),

    /// Persistence failed.
    #[error(transparent)]
    Store(#[from] optima_store::errors::StoreError),
}

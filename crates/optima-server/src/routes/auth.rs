//! Password-reset routes.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::errors::ApiError;
use crate::state::AppState;

/// Body of `POST /api/auth/forgot-password`.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordBody {
    /// Account email.
    pub email: String,
}

/// Body of `PUT /api/auth/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordBody {
    /// Reset token from the emailed link.
    pub token: String,
    /// Replacement password.
    pub password: String,
}

/// `POST /api/auth/forgot-password`: email a reset link.
#[instrument(skip_all)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordBody>,
) -> Result<Json<Value>, ApiError> {
    if body.email.trim().is_empty() {
        return Err(ApiError::InvalidParams("email must not be empty".into()));
    }
    state.auth.forgot_password(&body.email).await?;
    Ok(Json(json!({ "status": "ok" })))
}

/// `PUT /api/auth/reset-password`: consume a token, set the new password.
#[instrument(skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordBody>,
) -> Result<Json<Value>, ApiError> {
    if body.password.len() < 8 {
        return Err(ApiError::InvalidParams(
            "password must be at least 8 characters".into(),
        ));
    }
    state.auth.reset_password(&body.token, &body.password).await?;
    Ok(Json(json!({ "status": "ok" })))
}

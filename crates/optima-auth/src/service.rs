//! The password-reset flow.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use optima_store::pool::StorePool;
use optima_store::repositories::{ResetTokenRepo, UserRepo};
use optima_store::row_types::UserRow;

use crate::errors::{AuthError, Result};
use crate::mailer::Mailer;
use crate::password::{hash_password, verify_password};
use crate::tokens::{decode_reset_token, sign_reset_token, token_hash};

/// Auth configuration, resolved from settings by the caller.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// HS256 signing secret for reset tokens.
    pub jwt_secret: String,
    /// Reset-token lifetime in minutes.
    pub token_ttl_minutes: i64,
    /// Base URL the emailed link points at; the token is appended as a
    /// `token` query parameter.
    pub reset_link_base: String,
}

/// Account and reset-token operations.
pub struct AuthService {
    pool: StorePool,
    mailer: Arc<Mailer>,
    config: AuthConfig,
}

impl AuthService {
    /// New service.
    #[must_use]
    pub fn new(pool: StorePool, mailer: Arc<Mailer>, config: AuthConfig) -> Self {
        Self {
            pool,
            mailer,
            config,
        }
    }

    /// Create an account with a hashed password.
    pub fn create_user(&self, email: &str, password: &str) -> Result<UserRow> {
        let hash = hash_password(password)?;
        Ok(self.pool.with_conn(|conn| UserRepo::create(conn, email, &hash))?)
    }

    /// Check a login credential pair.
    pub fn check_credentials(&self, email: &str, password: &str) -> Result<UserRow> {
        let user = self
            .pool
            .with_conn(|conn| UserRepo::get_by_email(conn, email))?
            .ok_or(AuthError::UserNotFound)?;
        if verify_password(password, &user.password_hash)? {
            Ok(user)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    /// Start a reset: issue a token for the account, store its hash, and
    /// email the reset link. Sends exactly one email per call.
    #[instrument(skip_all)]
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let user = self
            .pool
            .with_conn(|conn| UserRepo::get_by_email(conn, email))?
            .ok_or(AuthError::UserNotFound)?;

        let (token, expires_at) =
            sign_reset_token(&self.config.jwt_secret, &user.id, self.config.token_ttl_minutes)?;
        let _ = self.pool.with_conn(|conn| {
            ResetTokenRepo::insert(conn, &user.id, &token_hash(&token), &expires_at)
        })?;

        let link = format!("{}?token={token}", self.config.reset_link_base);
        let body = format!(
            "A password reset was requested for your account.\n\n\
             Reset your password: {link}\n\n\
             The link expires in {} minutes. If you did not request this, \
             ignore this email.",
            self.config.token_ttl_minutes
        );
        self.mailer
            .send(&user.email, "Reset your password", &body)
            .await?;
        info!(user_id = %user.id, "reset email dispatched");
        Ok(())
    }

    /// Verify a reset token without consuming it. Returns the user ID.
    pub fn verify_reset_token(&self, token: &str) -> Result<String> {
        let claims = decode_reset_token(&self.config.jwt_secret, token)?;
        let row = self
            .pool
            .with_conn(|conn| ResetTokenRepo::get_valid(conn, &token_hash(token)))?
            .ok_or(AuthError::InvalidToken)?;
        if row.user_id != claims.sub {
            warn!("reset token subject does not match stored record");
            return Err(AuthError::InvalidToken);
        }
        Ok(claims.sub)
    }

    /// Complete a reset: verify, consume the token, store the new hash.
    #[instrument(skip_all)]
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        let user_id = self.verify_reset_token(token)?;

        let consumed = self
            .pool
            .with_conn(|conn| ResetTokenRepo::consume(conn, &token_hash(token)))?;
        if !consumed {
            return Err(AuthError::InvalidToken);
        }

        let hash = hash_password(new_password)?;
        let updated = self
            .pool
            .with_conn(|conn| UserRepo::update_password_hash(conn, &user_id, &hash))?;
        if !updated {
            return Err(AuthError::UserNotFound);
        }
        info!(user_id, "password reset completed");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! # optima-auth
//!
//! Account credentials and the password-reset flow: argon2id password
//! hashing, HS256 reset tokens (JWT in the emailed link, SHA-256 of the
//! token at rest for one-time consumption), and SMTP delivery via lettre
//! with a log-only mode for development.

#![deny(unsafe_code)]

pub mod errors;
pub mod mailer;
pub mod password;
pub mod service;
pub mod tokens;

pub use errors::{AuthError, Result};
pub use mailer::{Mailer, OutgoingEmail};
pub use service::{AuthConfig, AuthService};

//! Email delivery.
//!
//! SMTP via lettre when configured; otherwise messages are logged so the
//! reset flow stays usable in development without a mail server. The
//! in-memory variant exists for tests that assert on delivery counts.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

use crate::errors::{AuthError, Result};

/// A captured email (memory mailer only).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingEmail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Email transport.
pub enum Mailer {
    /// Real SMTP delivery.
    Smtp {
        /// Async SMTP transport (pooled).
        transport: AsyncSmtpTransport<Tokio1Executor>,
        /// From address.
        from: String,
    },
    /// Development mode: log instead of sending.
    LogOnly {
        /// From address (logged).
        from: String,
    },
    /// Test mode: capture sends in memory.
    Memory {
        /// From address.
        from: String,
        /// Captured messages.
        sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    },
}

impl Mailer {
    /// SMTP mailer against `host:port` with optional credentials.
    pub fn smtp(
        host: &str,
        port: u16,
        user: Option<&str>,
        pass: Option<&str>,
        from: &str,
    ) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| AuthError::Email(e.to_string()))?
            .port(port);
        if let (Some(user), Some(pass)) = (user, pass) {
            builder = builder.credentials(Credentials::new(user.to_owned(), pass.to_owned()));
        }
        Ok(Self::Smtp {
            transport: builder.build(),
            from: from.to_owned(),
        })
    }

    /// Log-only mailer.
    #[must_use]
    pub fn log_only(from: &str) -> Self {
        Self::LogOnly {
            from: from.to_owned(),
        }
    }

    /// In-memory mailer plus a handle to the captured messages.
    #[must_use]
    pub fn memory(from: &str) -> (Self, Arc<Mutex<Vec<OutgoingEmail>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        (
            Self::Memory {
                from: from.to_owned(),
                sent: sent.clone(),
            },
            sent,
        )
    }

    /// Send a plain-text message.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        match self {
            Self::Smtp { transport, from } => {
                let message = Message::builder()
                    .from(from.parse().map_err(|e| {
                        AuthError::Email(format!("invalid from address {from}: {e}"))
                    })?)
                    .to(to
                        .parse()
                        .map_err(|e| AuthError::Email(format!("invalid recipient {to}: {e}")))?)
                    .subject(subject)
                    .header(ContentType::TEXT_PLAIN)
                    .body(body.to_owned())
                    .map_err(|e| AuthError::Email(e.to_string()))?;
                let _ = transport
                    .send(message)
                    .await
                    .map_err(|e| AuthError::Email(e.to_string()))?;
                info!(to, subject, "email sent");
                Ok(())
            }
            Self::LogOnly { from } => {
                info!(from, to, subject, body, "SMTP not configured, logging email");
                Ok(())
            }
            Self::Memory { sent, .. } => {
                sent.lock().push(OutgoingEmail {
                    to: to.to_owned(),
                    subject: subject.to_owned(),
                    body: body.to_owned(),
                });
                Ok(())
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

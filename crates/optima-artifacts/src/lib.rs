//! # optima-artifacts
//!
//! Document ("artifact") generation: a registry of per-kind handlers that
//! stream [`optima_core::events::DeltaEvent`]s to the client while the
//! model produces content, plus the service that dispatches requests and
//! persists the final content.
//!
//! The streaming contract: every dispatch emits `start` first and the
//! stream ends with exactly one `finish` or `error`. The persisted content
//! equals the concatenation of the fragments streamed before `finish`.

#![deny(unsafe_code)]

pub mod errors;
pub mod fences;
pub mod handler;
pub mod handlers;
pub mod kinds;
pub mod service;
pub mod writer;

pub use errors::{ArtifactError, Result};
pub use handler::{DocumentHandler, HandlerRegistry};
pub use kinds::DocumentKind;
pub use service::ArtifactService;
pub use writer::DeltaWriter;

/// Document generation metric (counter, labels: kind, operation).
pub const DOCUMENT_GENERATIONS_TOTAL: &str = "document_generations_total";

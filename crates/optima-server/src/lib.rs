//! # optima-server
//!
//! The HTTP surface: axum router, JSON error envelope, SSE delta
//! streaming for chat and document generation, the auth and video routes,
//! and Prometheus metrics.

#![deny(unsafe_code)]

pub mod errors;
pub mod metrics;
pub mod routes;
pub mod sse;
pub mod state;

pub use errors::ApiError;
pub use routes::router;
pub use state::AppState;

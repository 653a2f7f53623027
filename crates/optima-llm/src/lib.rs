//! # optima-llm
//!
//! LLM provider trait and shared streaming utilities.
//!
//! Each vendor module follows the same composition: `types` (config +
//! request/response wire structs) and `provider` (entry point implementing
//! [`provider::Provider`]). The provider POSTs a streaming request, parses
//! SSE chunks with `eventsource-stream`, and re-emits them as
//! [`optima_core::events::DeltaEvent`]s.
//!
//! Image generation is separate ([`image::ImageGenerator`]): it is a
//! single-shot call with one hardcoded fallback provider, not a stream.

#![deny(unsafe_code)]

pub mod anthropic;
pub mod error_parsing;
pub mod factory;
pub mod image;
pub mod openai;
pub mod provider;
pub mod sse;
pub mod stop_reason;

pub use factory::ProviderRegistry;
pub use image::{GeneratedImage, ImageBackend, ImageGenerator};
pub use provider::{ChatRequest, DeltaEventStream, Provider, ProviderError, ProviderResult};

/// Provider request metric (counter, labels: provider).
pub const PROVIDER_REQUESTS_TOTAL: &str = "provider_requests_total";
/// Provider error metric (counter, labels: provider, status).
pub const PROVIDER_ERRORS_TOTAL: &str = "provider_errors_total";

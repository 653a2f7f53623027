//! Anthropic messages-API provider.

pub mod provider;
pub mod types;

pub use provider::AnthropicProvider;
pub use types::AnthropicConfig;

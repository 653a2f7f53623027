//! OpenAI chat-completions provider.

pub mod provider;
pub mod types;

pub use provider::OpenAIProvider;
pub use types::OpenAIConfig;

//! Narration-script generation.

use std::sync::Arc;

use tracing::instrument;

use optima_llm::{ChatRequest, Provider};

use crate::errors::{MediaError, Result};

const SYSTEM_PROMPT: &str = "You write narration scripts for short videos. Write natural spoken \
     prose only: no scene directions, no speaker labels, no markdown. \
     Aim for roughly 150 spoken words per minute.";

/// Generates narration scripts through the configured LLM provider.
pub struct ScriptGenerator {
    provider: Arc<dyn Provider>,
}

impl ScriptGenerator {
    /// New generator backed by `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    /// Write a script for `topic`, sized to `duration_seconds` when given.
    #[instrument(skip_all, fields(topic))]
    pub async fn generate(&self, topic: &str, duration_seconds: Option<u32>) -> Result<String> {
        if topic.trim().is_empty() {
            return Err(MediaError::invalid("topic must not be empty"));
        }
        let prompt = match duration_seconds {
            Some(secs) => format!("Write a narration script about: {topic}\nTarget length: {secs} seconds of speech."),
            None => format!("Write a narration script about: {topic}"),
        };
        let request = ChatRequest::from_prompt(prompt).with_system(SYSTEM_PROMPT);
        let script = self.provider.complete(&request).await?;
        Ok(script.trim().to_owned())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! Incremental markdown-fence stripping.
//!
//! Code handlers stream model output as it arrives, but models routinely
//! wrap code in ```` ``` ```` fences. Stripping only the persisted copy
//! would make the stream and the stored document disagree, so the filter
//! removes the opening and closing fence lines from the stream itself.
//!
//! The filter is line-buffered and holds back the most recent complete
//! line: a trailing fence can only be identified once the stream ends, so
//! the last line is never emitted until the next line begins (or
//! [`FenceFilter::finish`] runs).

/// Streaming fence filter. Feed chunks with [`push`](Self::push), then
/// call [`finish`](Self::finish) exactly once.
#[derive(Debug, Default)]
pub struct FenceFilter {
    /// Current incomplete line.
    pending: String,
    /// Last complete line, not yet emitted.
    held: Option<String>,
    /// Still before the first content line (a fence opener here is dropped).
    at_start: bool,
    /// Whether anything has been emitted (controls newline joining).
    emitted: bool,
}

impl FenceFilter {
    /// New filter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            at_start: true,
            ..Self::default()
        }
    }

    /// Feed a chunk; returns the text safe to emit now, if any.
    pub fn push(&mut self, chunk: &str) -> Option<String> {
        let mut out = String::new();
        for ch in chunk.chars() {
            if ch == '\n' {
                let line = std::mem::take(&mut self.pending);
                self.complete_line(line, &mut out);
            } else {
                self.pending.push(ch);
            }
        }
        (!out.is_empty()).then_some(out)
    }

    /// Flush the tail; drops a trailing fence line.
    pub fn finish(mut self) -> Option<String> {
        let mut out = String::new();
        let tail = std::mem::take(&mut self.pending);
        if let Some(held) = self.held.take() {
            // The held line is only a closing fence when nothing follows it.
            if !(tail.is_empty() && is_fence_line(&held)) {
                self.emit_line(&held, &mut out);
            }
        }
        if !tail.is_empty() && !is_fence_line(&tail) {
            self.emit_line(&tail, &mut out);
        }
        (!out.is_empty()).then_some(out)
    }

    fn complete_line(&mut self, line: String, out: &mut String) {
        if self.at_start {
            if line.trim().is_empty() {
                return;
            }
            self.at_start = false;
            if line.trim_start().starts_with("```") {
                return;
            }
        }
        if let Some(prev) = self.held.replace(line) {
            self.emit_line(&prev, out);
        }
    }

    fn emit_line(&mut self, line: &str, out: &mut String) {
        if self.emitted {
            out.push('\n');
        }
        out.push_str(line);
        self.emitted = true;
    }
}

fn is_fence_line(line: &str) -> bool {
    line.trim() == "```"
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

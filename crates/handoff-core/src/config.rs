//! Configuration for handoff generation

use crate::decision::DEFAULT_GROWTH_THRESHOLD;
use crate::transcript::{TranscriptLimits, MAX_EXCERPTS, MAX_EXCERPT_CHARS};
use handoff_generate::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User settings, read from `~/.claude/handoff.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandoffSettings {
    /// Model used to write handoffs
    pub model: String,

    /// Output token cap for a single handoff
    pub max_tokens: u32,

    /// Most recent transcript turns kept in the prompt
    pub max_excerpts: usize,

    /// Per-turn character cap
    pub max_excerpt_chars: usize,

    /// Minimum transcript growth since the last compaction handoff
    /// for a session-end handoff to run
    pub growth_threshold: f64,
}

impl HandoffSettings {
    pub fn new() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            max_excerpts: MAX_EXCERPTS,
            max_excerpt_chars: MAX_EXCERPT_CHARS,
            growth_threshold: DEFAULT_GROWTH_THRESHOLD,
        }
    }

    /// Load settings, falling back to defaults when missing or malformed
    pub fn load(path: &Path) -> Self {
        handoff_state::read_json(path).unwrap_or_default()
    }

    pub fn limits(&self) -> TranscriptLimits {
        TranscriptLimits {
            max_excerpts: self.max_excerpts,
            max_excerpt_chars: self.max_excerpt_chars,
        }
    }
}

impl Default for HandoffSettings {
    fn default() -> Self {
        Self::new()
    }
}

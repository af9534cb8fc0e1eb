//! Handoff decision engine, transcript reduction, prompt assembly, and tool auto-approval

mod approve;
mod briefing;
mod config;
mod decision;
mod prompt;
mod runner;
mod title;
mod transcript;
mod types;

pub use approve::{is_safe_bash_command, should_auto_approve, ToolUseInput, ALWAYS_SAFE_TOOLS};
pub use briefing::{render_briefing, BriefingDoc, MAX_BRIEFING_DOC_CHARS};
pub use config::HandoffSettings;
pub use decision::{decide, growth_ratio, Decision, HandoffEngine, DEFAULT_GROWTH_THRESHOLD};
pub use prompt::{build_handoff_prompt, project_name, PromptContext, HANDOFF_TEMPLATE};
pub use runner::{HandoffError, HandoffOutcome, HandoffRunner};
pub use title::{fallback_handoff, normalize_title, split_generated, GeneratedHandoff};
pub use transcript::{
    excerpts, read_transcript, transcript_size, Conversation, Excerpt, Role, TranscriptLimits,
    EXCERPT_SEPARATOR, MAX_EXCERPTS, MAX_EXCERPT_CHARS,
};
pub use types::{HookInput, Trigger, TriggerKind};

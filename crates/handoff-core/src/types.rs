//! Hook input and trigger types

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Trigger labels that fire just before the context window is compacted
const PREEMPTIVE_TRIGGERS: [&str; 2] = ["auto", "PreCompact"];

/// How a trigger relates to the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// Compaction is imminent; always worth a handoff
    Preemptive,
    /// Session end, manual compaction, or anything else
    Final,
}

/// The event label that invoked a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger(String);

impl Trigger {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> TriggerKind {
        if PREEMPTIVE_TRIGGERS.contains(&self.0.as_str()) {
            TriggerKind::Preemptive
        } else {
            TriggerKind::Final
        }
    }

    pub fn is_preemptive(&self) -> bool {
        self.kind() == TriggerKind::Preemptive
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Deserialize)]
struct RawHookInput {
    #[serde(default)]
    session_id: serde_json::Value,
    #[serde(default)]
    transcript_path: serde_json::Value,
    #[serde(default)]
    cwd: serde_json::Value,
    #[serde(default)]
    hook_event_name: serde_json::Value,
    #[serde(default)]
    trigger: serde_json::Value,
    #[serde(default)]
    source: serde_json::Value,
}

/// Strings and numbers as text; empty strings and anything else are absent
fn text_field(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Hook payload read from stdin, with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct HookInput {
    pub session_id: String,
    pub transcript_path: PathBuf,
    pub cwd: PathBuf,
    pub hook_event_name: String,
    pub trigger: Trigger,
    /// Session-start only: `"compact"` when resuming after a compaction
    pub source: Option<String>,
}

impl HookInput {
    /// Parse a hook payload. Missing, empty, or non-text fields take their defaults;
    /// `trigger` falls back to `hook_event_name`.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        if !value.is_object() {
            return Err(serde::de::Error::custom("hook input must be a JSON object"));
        }
        let raw: RawHookInput = serde_json::from_value(value)?;

        let hook_event_name =
            text_field(raw.hook_event_name).unwrap_or_else(|| "unknown".to_string());
        let trigger = text_field(raw.trigger).unwrap_or_else(|| hook_event_name.clone());
        let cwd = text_field(raw.cwd).map(PathBuf::from).unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        });

        Ok(Self {
            session_id: text_field(raw.session_id).unwrap_or_else(|| "unknown".to_string()),
            transcript_path: PathBuf::from(text_field(raw.transcript_path).unwrap_or_default()),
            cwd,
            hook_event_name,
            trigger: Trigger::new(trigger),
            source: text_field(raw.source),
        })
    }

    pub fn is_post_compact(&self) -> bool {
        self.source.as_deref() == Some("compact")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_kinds() {
        assert_eq!(Trigger::new("auto").kind(), TriggerKind::Preemptive);
        assert_eq!(Trigger::new("PreCompact").kind(), TriggerKind::Preemptive);
        assert_eq!(Trigger::new("SessionEnd").kind(), TriggerKind::Final);
        assert_eq!(Trigger::new("manual").kind(), TriggerKind::Final);
        assert!(!Trigger::new("precompact").is_preemptive());
    }

    #[test]
    fn test_hook_input_full() {
        let input = HookInput::from_json(
            r#"{
                "session_id": "abc-123",
                "transcript_path": "/tmp/t.jsonl",
                "cwd": "/work/project",
                "hook_event_name": "PreCompact",
                "trigger": "auto"
            }"#,
        )
        .unwrap();

        assert_eq!(input.session_id, "abc-123");
        assert_eq!(input.transcript_path, PathBuf::from("/tmp/t.jsonl"));
        assert_eq!(input.cwd, PathBuf::from("/work/project"));
        assert_eq!(input.hook_event_name, "PreCompact");
        assert_eq!(input.trigger.label(), "auto");
        assert!(input.trigger.is_preemptive());
        assert!(!input.is_post_compact());
    }

    #[test]
    fn test_hook_input_defaults() {
        let input = HookInput::from_json("{}").unwrap();
        assert_eq!(input.session_id, "unknown");
        assert_eq!(input.hook_event_name, "unknown");
        assert_eq!(input.trigger.label(), "unknown");
        assert_eq!(input.transcript_path, PathBuf::new());
        assert_eq!(input.cwd, std::env::current_dir().unwrap());
    }

    #[test]
    fn test_trigger_falls_back_to_event_name() {
        let input =
            HookInput::from_json(r#"{"hook_event_name": "SessionEnd", "trigger": ""}"#).unwrap();
        assert_eq!(input.trigger, Trigger::new("SessionEnd"));
    }

    #[test]
    fn test_hook_input_source() {
        let input = HookInput::from_json(r#"{"source": "compact"}"#).unwrap();
        assert!(input.is_post_compact());
    }

    #[test]
    fn test_hook_input_tolerates_odd_field_types() {
        let input = HookInput::from_json(
            r#"{
                "session_id": 12345,
                "transcript_path": null,
                "cwd": ["not", "a", "path"],
                "hook_event_name": "SessionEnd",
                "trigger": false,
                "source": {"kind": "compact"}
            }"#,
        )
        .unwrap();

        assert_eq!(input.session_id, "12345");
        assert_eq!(input.transcript_path, PathBuf::new());
        assert_eq!(input.cwd, std::env::current_dir().unwrap());
        assert_eq!(input.trigger.label(), "SessionEnd");
        assert_eq!(input.source, None);
    }

    #[test]
    fn test_hook_input_rejects_non_object() {
        assert!(HookInput::from_json("not json").is_err());
        assert!(HookInput::from_json("[1, 2]").is_err());
    }
}

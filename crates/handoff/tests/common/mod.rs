use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use handoff_core::{HookInput, Trigger};
use handoff_generate::{GenerateError, GenerationRequest, Generator};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Generator returning a fixed reply, or failing when `reply` is `None`
pub struct ScriptedGenerator {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(GenerateError::Api {
                status: 529,
                message: "overloaded".to_string(),
            }),
        }
    }
}

pub fn write_transcript(path: &Path, turns: &[(&str, &str)]) {
    let lines: Vec<String> = turns
        .iter()
        .map(|(kind, text)| {
            serde_json::json!({"type": kind, "message": {"role": kind, "content": text}})
                .to_string()
        })
        .collect();
    std::fs::write(path, lines.join("\n")).unwrap();
}

pub fn hook_input(session_id: &str, transcript: &Path, cwd: &Path, trigger: &str) -> HookInput {
    HookInput {
        session_id: session_id.to_string(),
        transcript_path: transcript.to_path_buf(),
        cwd: cwd.to_path_buf(),
        hook_event_name: trigger.to_string(),
        trigger: Trigger::new(trigger),
        source: None,
    }
}

pub fn fixed_now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap()
}

pub fn handoff_files(cwd: &Path) -> Vec<String> {
    let dir = cwd.join("docs").join("session_handoffs");
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

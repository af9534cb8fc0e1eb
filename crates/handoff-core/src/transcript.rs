//! Transcript reduction: JSONL session log to role-tagged excerpts

use std::collections::VecDeque;
use std::fmt;
use std::path::Path;

/// Most recent turns kept from a transcript
pub const MAX_EXCERPTS: usize = 80;

/// Character cap applied to each turn's text
pub const MAX_EXCERPT_CHARS: usize = 3000;

pub const EXCERPT_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Map a transcript record `type` to a role; other record kinds are `None`
    pub fn from_record_type(kind: &str) -> Option<Self> {
        match kind {
            "human" | "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Assistant => "ASSISTANT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt {
    pub role: Role,
    pub text: String,
}

impl fmt::Display for Excerpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.role.label(), self.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscriptLimits {
    pub max_excerpts: usize,
    pub max_excerpt_chars: usize,
}

impl Default for TranscriptLimits {
    fn default() -> Self {
        Self {
            max_excerpts: MAX_EXCERPTS,
            max_excerpt_chars: MAX_EXCERPT_CHARS,
        }
    }
}

fn extract_text(record: &serde_json::Value) -> String {
    let Some(content) = record.pointer("/message/content") else {
        return String::new();
    };
    if let Some(s) = content.as_str() {
        return s.to_string();
    }
    match content.as_array() {
        Some(blocks) => blocks
            .iter()
            .filter(|b| b.get("type").and_then(|t| t.as_str()) == Some("text"))
            .map(|b| b.get("text").and_then(|t| t.as_str()).unwrap_or(""))
            .collect::<Vec<_>>()
            .join("\n"),
        None => String::new(),
    }
}

fn parse_line(line: &str, max_chars: usize) -> Option<Excerpt> {
    let record: serde_json::Value = serde_json::from_str(line).ok()?;
    let role = record
        .get("type")
        .and_then(|t| t.as_str())
        .and_then(Role::from_record_type)?;

    let text = extract_text(&record);
    if text.trim().is_empty() {
        return None;
    }

    Some(Excerpt {
        role,
        text: text.chars().take(max_chars).collect(),
    })
}

/// Lazily yield excerpts from transcript text, in document order.
///
/// Blank lines, lines that are not JSON, non-conversation records, and
/// records without text are skipped.
pub fn excerpts(content: &str, max_chars: usize) -> impl Iterator<Item = Excerpt> + '_ {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(move |line| parse_line(line, max_chars))
}

/// The tail window of a transcript, ready for prompting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    excerpts: Vec<Excerpt>,
}

impl Conversation {
    pub fn from_content(content: &str, limits: TranscriptLimits) -> Self {
        let mut window = VecDeque::with_capacity(limits.max_excerpts.min(1024));
        for excerpt in excerpts(content, limits.max_excerpt_chars) {
            if window.len() == limits.max_excerpts {
                window.pop_front();
            }
            if limits.max_excerpts > 0 {
                window.push_back(excerpt);
            }
        }
        Self {
            excerpts: window.into(),
        }
    }

    pub fn excerpts(&self) -> &[Excerpt] {
        &self.excerpts
    }

    pub fn len(&self) -> usize {
        self.excerpts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.excerpts.is_empty()
    }

    /// `ROLE: text` blocks joined by [`EXCERPT_SEPARATOR`]
    pub fn render(&self) -> String {
        self.excerpts
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(EXCERPT_SEPARATOR)
    }
}

/// Read and reduce a transcript. An unreadable file is an empty conversation.
///
/// Bytes are decoded lossily, so a record torn mid-append is skipped like
/// any other bad line.
pub fn read_transcript(path: &Path, limits: TranscriptLimits) -> Conversation {
    match std::fs::read(path) {
        Ok(bytes) => Conversation::from_content(&String::from_utf8_lossy(&bytes), limits),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "transcript not found");
            Conversation::default()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "error reading transcript");
            Conversation::default()
        }
    }
}

/// Transcript size in bytes, 0 when it cannot be read
pub fn transcript_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(text: &str) -> String {
        serde_json::json!({"type": "user", "message": {"role": "user", "content": text}})
            .to_string()
    }

    fn assistant_blocks(blocks: serde_json::Value) -> String {
        serde_json::json!({"type": "assistant", "message": {"role": "assistant", "content": blocks}})
            .to_string()
    }

    #[test]
    fn test_string_and_block_content() {
        let content = [
            user("fix the login bug"),
            assistant_blocks(serde_json::json!([
                {"type": "text", "text": "Looking at auth.rs"},
                {"type": "tool_use", "name": "Read", "input": {"file_path": "auth.rs"}},
                {"type": "text", "text": "Found it"}
            ])),
        ]
        .join("\n");

        let conv = Conversation::from_content(&content, TranscriptLimits::default());
        assert_eq!(conv.len(), 2);
        assert_eq!(conv.excerpts()[0].role, Role::User);
        assert_eq!(conv.excerpts()[0].text, "fix the login bug");
        assert_eq!(conv.excerpts()[1].role, Role::Assistant);
        assert_eq!(conv.excerpts()[1].text, "Looking at auth.rs\nFound it");
        assert_eq!(
            conv.render(),
            "USER: fix the login bug\n\n---\n\nASSISTANT: Looking at auth.rs\nFound it"
        );
    }

    #[test]
    fn test_human_record_type_is_user() {
        let line = r#"{"type": "human", "message": {"content": "hello"}}"#;
        let all: Vec<_> = excerpts(line, 100).collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].role, Role::User);
    }

    #[test]
    fn test_skips_malformed_blank_and_other_records() {
        let content = [
            "".to_string(),
            "   ".to_string(),
            "{not json".to_string(),
            r#"{"type": "summary", "summary": "old stuff"}"#.to_string(),
            r#"{"type": "system", "message": {"content": "system text"}}"#.to_string(),
            user("kept"),
            r#"{"type": "user", "message": {"content": [{"type": "tool_result", "content": "ok"}]}}"#
                .to_string(),
            r#"{"type": "assistant"}"#.to_string(),
        ]
        .join("\n");

        let conv = Conversation::from_content(&content, TranscriptLimits::default());
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.excerpts()[0].text, "kept");
    }

    #[test]
    fn test_text_truncated_by_chars() {
        let long = "é".repeat(5000);
        let conv = Conversation::from_content(&user(&long), TranscriptLimits::default());
        assert_eq!(conv.excerpts()[0].text.chars().count(), 3000);
    }

    #[test]
    fn test_tail_window_keeps_latest_in_order() {
        let content = (0..100)
            .map(|i| user(&format!("message {}", i)))
            .collect::<Vec<_>>()
            .join("\n");

        let conv = Conversation::from_content(&content, TranscriptLimits::default());
        assert_eq!(conv.len(), 80);
        assert_eq!(conv.excerpts()[0].text, "message 20");
        assert_eq!(conv.excerpts()[79].text, "message 99");
        for pair in conv.excerpts().windows(2) {
            let a: usize = pair[0].text["message ".len()..].parse().unwrap();
            let b: usize = pair[1].text["message ".len()..].parse().unwrap();
            assert!(a < b);
        }
    }

    #[test]
    fn test_fewer_than_window_kept_whole() {
        let content = (0..5)
            .map(|i| user(&format!("m{}", i)))
            .collect::<Vec<_>>()
            .join("\n");
        let conv = Conversation::from_content(&content, TranscriptLimits::default());
        assert_eq!(conv.len(), 5);
    }

    #[test]
    fn test_read_missing_transcript_is_empty() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("missing.jsonl");
        let conv = read_transcript(&path, TranscriptLimits::default());
        assert!(conv.is_empty());
        assert_eq!(conv.render(), "");
        assert_eq!(transcript_size(&path), 0);
    }

    #[test]
    fn test_read_transcript_and_size() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("t.jsonl");
        let content = format!("{}\n{}\n", user("a"), user("b"));
        std::fs::write(&path, &content).unwrap();

        let conv = read_transcript(&path, TranscriptLimits::default());
        assert_eq!(conv.len(), 2);
        assert_eq!(transcript_size(&path), content.len() as u64);
    }

    #[test]
    fn test_read_transcript_with_torn_multibyte_tail() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("t.jsonl");
        let mut bytes = format!("{}\n", user("café order")).into_bytes();
        bytes.extend_from_slice(br#"{"type":"assistant","message":{"content":"caf"#);
        bytes.push(0xC3);
        std::fs::write(&path, &bytes).unwrap();

        let conv = read_transcript(&path, TranscriptLimits::default());
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.excerpts()[0].text, "café order");
    }
}

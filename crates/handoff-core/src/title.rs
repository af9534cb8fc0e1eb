//! Splits generated text into a file-name slug and the document body

use regex::Regex;
use std::sync::OnceLock;

static SHORT_TITLE_RE: OnceLock<Regex> = OnceLock::new();
static SHORT_TITLE_LINE_RE: OnceLock<Regex> = OnceLock::new();
static QUOTES_RE: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();
static NON_SLUG_RE: OnceLock<Regex> = OnceLock::new();

const MAX_TITLE_CHARS: usize = 50;
const DEFAULT_TITLE: &str = "session";
const ERROR_TITLE: &str = "error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedHandoff {
    pub short_title: String,
    pub body: String,
}

/// Reduce a free-form title to `[a-z0-9-]`, at most 50 chars
pub fn normalize_title(raw: &str) -> String {
    let quotes = QUOTES_RE.get_or_init(|| Regex::new(r#"[\[\]"']"#).unwrap());
    let whitespace = WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").unwrap());
    let non_slug = NON_SLUG_RE.get_or_init(|| Regex::new(r"[^a-z0-9-]").unwrap());

    let title = raw.trim().to_lowercase();
    let title = quotes.replace_all(&title, "");
    let title = whitespace.replace_all(&title, "-");
    let title = non_slug.replace_all(&title, "");
    title.chars().take(MAX_TITLE_CHARS).collect()
}

/// Split model output on its first `SHORT_TITLE:` line.
///
/// Without a usable title the slug is `session`.
pub fn split_generated(text: &str) -> GeneratedHandoff {
    let title_re = SHORT_TITLE_RE.get_or_init(|| Regex::new(r"SHORT_TITLE:\s*(.+)").unwrap());
    let line_re =
        SHORT_TITLE_LINE_RE.get_or_init(|| Regex::new(r"SHORT_TITLE:\s*.+\n?").unwrap());

    let short_title = title_re
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| normalize_title(m.as_str()))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let body = line_re.replace(text, "").trim().to_string();

    GeneratedHandoff { short_title, body }
}

/// Minimal document written when generation fails
pub fn fallback_handoff(error: &str, trigger: &str, project: &str) -> GeneratedHandoff {
    GeneratedHandoff {
        short_title: ERROR_TITLE.to_string(),
        body: format!(
            "# Session Handoff (Auto-generated - API Error)\n\nError: {}\n\nTrigger: {}\nProject: {}",
            error, trigger, project
        ),
    }
}

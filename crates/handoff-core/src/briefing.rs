//! Session-start briefing built from earlier handoff documents

/// Per-document character cap in a briefing
pub const MAX_BRIEFING_DOC_CHARS: usize = 8000;

const RULE_WIDTH: usize = 60;
const DOC_RULE_WIDTH: usize = 40;

/// A previous handoff as read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BriefingDoc {
    pub name: String,
    /// File content, or the read error message
    pub content: Result<String, String>,
}

fn truncate_doc(content: &str) -> String {
    match content.char_indices().nth(MAX_BRIEFING_DOC_CHARS) {
        Some((cut, _)) => format!(
            "{}\n\n[... truncated for length ...]",
            &content[..cut]
        ),
        None => content.to_string(),
    }
}

/// Render the text printed to the new session. Empty when there is nothing to show.
pub fn render_briefing(project: &str, post_compact: bool, docs: &[BriefingDoc]) -> String {
    if docs.is_empty() {
        return String::new();
    }

    let rule = "=".repeat(RULE_WIDTH);
    let doc_rule = "-".repeat(DOC_RULE_WIDTH);
    let mut lines = Vec::new();

    lines.push(String::new());
    lines.push(rule.clone());
    if post_compact {
        lines.push(format!("CONTEXT COMPACTED - RESUMING: {}", project));
    } else {
        lines.push(format!("SESSION CONTEXT: {}", project));
    }
    lines.push(rule.clone());

    for (i, doc) in docs.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
            lines.push(doc_rule.clone());
            lines.push(String::new());
        }
        lines.push(format!("Previous handoff: {}", doc.name));
        lines.push(doc_rule.clone());
        match &doc.content {
            Ok(content) => lines.push(truncate_doc(content)),
            Err(e) => lines.push(format!("(Could not read: {})", e)),
        }
    }

    lines.push(String::new());
    lines.push(rule.clone());
    if post_compact {
        lines.push("Context was just compressed. Please continue where we left off.".to_string());
    } else {
        lines.push("TIP: Say 'load previous handoffs' if you need more context.".to_string());
    }
    lines.push(rule);

    lines.join("\n")
}

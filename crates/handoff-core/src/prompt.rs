//! Handoff prompt assembly

use std::path::Path;

pub const HANDOFF_TEMPLATE: &str = r#"
You are generating a session handoff document for an AI coding assistant.
The next session will read it to understand what was accomplished and pick the work up without losing context.

**Project**: {project_name}
**Trigger**: {trigger}
**Working Directory**: {cwd}

Using the conversation transcript below, write a thorough session handoff document.

CONVERSATION TRANSCRIPT:
{conversation}

---

Produce a markdown document with EXACTLY the structure shown below. Be specific.

RULES:
- The first line must be SHORT_TITLE followed by a 2-4 word lowercase hyphenated title; it becomes the file name
- Name the concrete files, paths, commands and technical details from the conversation
- Record each DECISION together with its RATIONALE and the alternatives that were rejected
- Keep ticket and issue references that were mentioned (e.g. CD-123, #456)
- Prefer markdown TABLES for structured data such as migrations, phases or status tracking
- Include short code snippets or schemas when they mattered

---

SHORT_TITLE: [2-4 word hyphenated title like "hooks-auto-handoffs" or "api-refactor-complete"]

# Session Handoff - [Descriptive Title]

**Date**: {date}
**Focus**: [One line on the main focus of this session]
**Status**: [State of the work, e.g. "Feature complete, needs testing" or "In progress, blocked on X"]

---

## Quick Context

**What's Working:**
- [Specific things that work now, with file names]

**What Needs Attention:**
- [Issues, blockers, pending decisions]

---

## Completed This Session

| Phase | Ticket | Description | Status |
|-------|--------|-------------|--------|
| 1 | CD-XXX | [What] | Done/In Progress |

### [Feature/Task Name]
**Files Created/Modified:**
- `path/to/file.ext` - [What was done]

**Details:**
[Technical details, configuration, patterns used]

---

## Key Decisions & Rationale

- **[Decision]**: [What was decided]
  - *Why*: [Reasoning and the alternatives considered]

---

## Technical Discoveries

- **[Topic]**: [Gotchas, patterns, insights]

---

## Files Changed This Session

### New Files
- `path/to/new/file.ext` - [Purpose]

### Modified Files
- `path/to/modified/file.ext` - [What changed]

---

## Next Steps

1. [ ] [Specific actionable task, with ticket reference if any]

---

## Open Questions

- **[Question]**: [The unresolved decision]
  - Option A: [Description]
  - Option B: [Description]

---

## Environment

- **Platform**: {platform}
- **Working Directory**: {cwd}
"#;

/// Everything substituted into [`HANDOFF_TEMPLATE`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext<'a> {
    pub project_name: &'a str,
    pub trigger: &'a str,
    pub cwd: &'a str,
    /// Calendar date, `YYYY-MM-DD`
    pub date: &'a str,
    pub platform: &'a str,
    pub conversation: &'a str,
}

impl PromptContext<'_> {
    fn value(&self, key: &str) -> Option<&str> {
        match key {
            "project_name" => Some(self.project_name),
            "trigger" => Some(self.trigger),
            "cwd" => Some(self.cwd),
            "date" => Some(self.date),
            "platform" => Some(self.platform),
            "conversation" => Some(self.conversation),
            _ => None,
        }
    }
}

/// Last path segment of the working directory
pub fn project_name(cwd: &Path) -> String {
    cwd.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| cwd.to_string_lossy().to_string())
}

/// Fill `{key}` placeholders in one left-to-right pass, so substituted
/// values are never scanned for placeholders themselves.
fn substitute(template: &str, ctx: &PromptContext<'_>) -> String {
    let mut out = String::with_capacity(template.len() + ctx.conversation.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after
            .find('}')
            .and_then(|close| ctx.value(&after[..close]).map(|v| (v, close)));

        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn build_handoff_prompt(ctx: &PromptContext<'_>) -> String {
    substitute(HANDOFF_TEMPLATE, ctx)
}

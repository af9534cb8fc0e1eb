//! Auto-approval of low-risk tool calls for the PreToolUse hook

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::sync::OnceLock;

/// Tools approved without inspecting their input
pub const ALWAYS_SAFE_TOOLS: &[&str] = &[
    "Read",
    "Glob",
    "Grep",
    "WebSearch",
    "TodoRead",
    "Write",
    "Edit",
    "NotebookEdit",
    "TodoWrite",
    "WebFetch",
];

const SAFE_BASH_PATTERNS: &[&str] = &[
    // git
    r"^git\s+(status|log|diff|branch|show|remote|fetch|ls-files|rev-parse)",
    r"^git\s+config",
    r"^git\s+add",
    r"^git\s+commit",
    r"^git\s+push",
    r"^git\s+pull",
    r"^git\s+checkout",
    r"^git\s+merge",
    r"^git\s+rebase",
    r"^git\s+stash",
    r"^git\s+tag",
    // listing and reading
    r"^ls(\s|$)",
    r"^pwd$",
    r"^dir(\s|$)",
    r"^cat\s",
    r"^head\s",
    r"^tail\s",
    r"^less\s",
    r"^more\s",
    // search
    r"^find\s",
    r"^grep\s",
    r"^rg\s",
    r"^ag\s",
    // packages, builds and tests
    r"^npm\s+(list|ls|outdated|info|view|search|install|i|ci|update|run)",
    r"^pip\s+(list|show|freeze|install)",
    r"^composer\s+(show|info|install|update|require)",
    r"^yarn(\s|$)",
    r"^npm\s+(test|run)",
    r"^pytest",
    r"^php\s+.*test",
    r"^phpunit",
    // environment
    r"^echo\s+\$",
    r"^env$",
    r"^printenv",
    r"^which\s",
    r"^where\s",
    r"^node\s+--version",
    r"^npm\s+--version",
    r"^python\s+--version",
    r"^php\s+--version",
    r"^git\s+--version",
    // system and processes
    r"^df(\s|$)",
    r"^du\s",
    r"^free(\s|$)",
    r"^uname",
    r"^whoami$",
    r"^hostname$",
    r"^ps(\s|$)",
    r"^top\s+-",
    // read-only network
    r"^ping\s+-c\s+\d",
    r"^curl\s+.*--head",
    r"^curl\s+-I\s",
];

/// Checked before the safe list; any match blocks approval
const DANGEROUS_PATTERNS: &[&str] = &[
    r"\brm\s+-rf\s+/",
    r"\bsudo\b",
    r"\bchmod\b",
    r"\bchown\b",
    r"\bmkfs\b",
    r"\bdd\s",
    r">\s*/",
    r"\|\s*sh\b",
    r"\|\s*bash\b",
    r"git\s+reset\s+--hard",
    r"git\s+clean\s+-f",
    r"git\s+push\s+.*--force",
    r"^git\s+rebase\s+-i",
];

static SAFE_BASH: OnceLock<Vec<Regex>> = OnceLock::new();
static DANGEROUS: OnceLock<Vec<Regex>> = OnceLock::new();

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| RegexBuilder::new(p).case_insensitive(true).build().unwrap())
        .collect()
}

/// PreToolUse hook payload; only the fields approval looks at
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolUseInput {
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: serde_json::Value,
}

impl ToolUseInput {
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    fn command(&self) -> &str {
        self.tool_input
            .get("command")
            .and_then(|c| c.as_str())
            .unwrap_or("")
    }
}

/// Whether a shell command is safe to run without asking
pub fn is_safe_bash_command(command: &str) -> bool {
    let command = command.trim();

    let dangerous = DANGEROUS.get_or_init(|| compile(DANGEROUS_PATTERNS));
    if dangerous.iter().any(|re| re.is_match(command)) {
        return false;
    }

    let safe = SAFE_BASH.get_or_init(|| compile(SAFE_BASH_PATTERNS));
    safe.iter().any(|re| re.is_match(command))
}

/// Approve always-safe tools and safe `Bash` commands; everything else goes
/// through the normal permission prompt.
pub fn should_auto_approve(input: &ToolUseInput) -> bool {
    if ALWAYS_SAFE_TOOLS.contains(&input.tool_name.as_str()) {
        return true;
    }
    input.tool_name == "Bash" && is_safe_bash_command(input.command())
}

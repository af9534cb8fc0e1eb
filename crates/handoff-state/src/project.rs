//! Per-project handoff directory layout

use crate::read_json;
use std::path::{Path, PathBuf};

/// Conventional handoff directories relative to the project root, in lookup order
const CONVENTIONAL_DIRS: [&[&str]; 3] = [
    &["docs", "session_handoffs"],
    &["session_handoffs"],
    &[".claude", "session_handoffs"],
];

/// Contents of `<project>/.claude/project.json`
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    pub handoffs_path: Option<String>,
    pub handoffs_to_load: usize,
}

const DEFAULT_HANDOFFS_TO_LOAD: usize = 1;

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            handoffs_path: None,
            handoffs_to_load: DEFAULT_HANDOFFS_TO_LOAD,
        }
    }
}

impl ProjectConfig {
    /// Load the project config, falling back to defaults when missing or malformed
    pub fn load(cwd: &Path) -> Self {
        read_json::<serde_json::Value>(&cwd.join(".claude").join("project.json"))
            .map(|value| Self::from_value(&value))
            .unwrap_or_default()
    }

    /// Each field is read on its own; an invalid one takes its default
    /// without discarding the rest. An empty `handoffs_path` is unset.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let handoffs_path = value
            .get("handoffs_path")
            .and_then(|v| v.as_str())
            .filter(|p| !p.is_empty())
            .map(String::from);

        let handoffs_to_load = match value.get("handoffs_to_load") {
            None => DEFAULT_HANDOFFS_TO_LOAD,
            Some(v) => match v.as_u64() {
                Some(n) => n as usize,
                None => {
                    tracing::warn!(value = %v, "ignoring invalid handoffs_to_load");
                    DEFAULT_HANDOFFS_TO_LOAD
                }
            },
        };

        Self {
            handoffs_path,
            handoffs_to_load,
        }
    }
}

fn conventional_dirs(cwd: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    CONVENTIONAL_DIRS
        .iter()
        .map(move |parts| parts.iter().fold(cwd.to_path_buf(), |p, s| p.join(s)))
}

/// Resolve the directory new handoffs are written to, creating it if needed.
///
/// A configured `handoffs_path` wins; otherwise the first existing
/// conventional directory; otherwise `docs/session_handoffs` is created.
pub fn resolve_handoff_dir(cwd: &Path, config: &ProjectConfig) -> std::io::Result<PathBuf> {
    if let Some(custom) = &config.handoffs_path {
        let path = cwd.join(custom);
        std::fs::create_dir_all(&path)?;
        return Ok(path);
    }

    if let Some(existing) = conventional_dirs(cwd).find(|p| p.exists()) {
        return Ok(existing);
    }

    let default_path = cwd.join("docs").join("session_handoffs");
    std::fs::create_dir_all(&default_path)?;
    Ok(default_path)
}

/// Locate an existing handoff directory without creating anything
pub fn find_handoff_dir(cwd: &Path, config: &ProjectConfig) -> Option<PathBuf> {
    if let Some(custom) = &config.handoffs_path {
        let path = cwd.join(custom);
        if path.exists() {
            return Some(path);
        }
    }

    conventional_dirs(cwd).find(|p| p.exists())
}

/// Most recent handoff documents, newest first.
///
/// File names start with a `YYYYMMDD-HHMM` stamp, so name order is
/// chronological order. README and template files are skipped.
pub fn recent_handoffs(dir: &Path, count: usize) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot list handoff directory");
            return Vec::new();
        }
    };

    let mut handoffs: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("md"))
        .filter(|p| {
            let name = p
                .file_name()
                .map(|n| n.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            !name.starts_with("readme") && !name.starts_with("template")
        })
        .collect();

    handoffs.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
    handoffs.truncate(count);
    handoffs
}

//! Path resolution for hook state and settings

use std::path::PathBuf;

/// Resolves standard paths under `~/.claude`
#[derive(Debug, Clone)]
pub struct Paths {
    pub home_claude: PathBuf,
}

impl Paths {
    /// Create a new Paths resolver rooted at the user's home directory
    pub fn new() -> std::io::Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;

        Ok(Self::with_home_claude(home.join(".claude")))
    }

    /// Create a resolver rooted at an explicit `.claude` directory
    pub fn with_home_claude(home_claude: impl Into<PathBuf>) -> Self {
        Self {
            home_claude: home_claude.into(),
        }
    }

    /// Directory holding per-session handoff state records
    pub fn state_dir(&self) -> PathBuf {
        self.home_claude.join("hooks").join(".state")
    }

    /// Get handoff.json settings path
    pub fn settings_path(&self) -> PathBuf {
        self.home_claude.join("handoff.json")
    }
}

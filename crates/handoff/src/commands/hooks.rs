use anyhow::Context;
use handoff_core::{
    project_name, render_briefing, should_auto_approve, transcript_size, BriefingDoc, Decision,
    HandoffOutcome, HandoffRunner, HandoffSettings, HookInput, ToolUseInput, Trigger,
};
use handoff_generate::AnthropicGenerator;
use handoff_state::{find_handoff_dir, recent_handoffs, FileStateStore, Paths, ProjectConfig};
use std::io::{self, Read};

const API_KEY_VARS: [&str; 2] = ["ANTHROPIC_API_KEY_HOOKS", "ANTHROPIC_API_KEY"];

fn api_key() -> anyhow::Result<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|key| !key.is_empty())
        .ok_or_else(|| anyhow::anyhow!("{} or {} not set", API_KEY_VARS[0], API_KEY_VARS[1]))
}

fn describe_outcome(trigger: &Trigger, outcome: &HandoffOutcome) -> String {
    match outcome {
        HandoffOutcome::Skipped { growth } => format!(
            "{}: Skipping (transcript grew {:.1}% since PreCompact)",
            trigger,
            growth * 100.0
        ),
        HandoffOutcome::NoConversation => {
            "No conversation content found, skipping handoff generation".to_string()
        }
        HandoffOutcome::Written { path, .. } => {
            format!("Session handoff saved to: {}", path.display())
        }
    }
}

pub fn hook_session_handoff() -> anyhow::Result<()> {
    // 1. Read hook input from stdin
    let mut input_str = String::new();
    io::stdin()
        .read_to_string(&mut input_str)
        .context("Error reading hook input")?;
    let input = HookInput::from_json(&input_str).context("Error parsing hook input")?;

    // 2. Load settings and state
    let paths = Paths::new()?;
    let settings = HandoffSettings::load(&paths.settings_path());
    let store = FileStateStore::new(paths.state_dir());
    let runner = HandoffRunner::new(&store, &settings);

    // 3. Skip a session end that adds little to the compaction handoff
    let size = transcript_size(&input.transcript_path);
    if let Decision::Skip { growth } = runner.check(&input, size) {
        let skipped = HandoffOutcome::Skipped { growth };
        println!("{}", describe_outcome(&input.trigger, &skipped));
        return Ok(());
    }

    // 4. Generate, write, and reconcile state
    let generator = AnthropicGenerator::new(api_key()?);
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let outcome = rt.block_on(runner.generate(&input, size, &generator, chrono::Local::now()))?;

    println!("{}", describe_outcome(&input.trigger, &outcome));
    Ok(())
}

fn session_briefing(input: &HookInput) -> String {
    let config = ProjectConfig::load(&input.cwd);
    let Some(dir) = find_handoff_dir(&input.cwd, &config) else {
        return String::new();
    };

    let docs: Vec<BriefingDoc> = recent_handoffs(&dir, config.handoffs_to_load)
        .into_iter()
        .map(|path| BriefingDoc {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            content: std::fs::read_to_string(&path).map_err(|e| e.to_string()),
        })
        .collect();

    render_briefing(&project_name(&input.cwd), input.is_post_compact(), &docs)
}

pub fn hook_session_start() -> anyhow::Result<()> {
    // Session start must never block the session, so bad input is a no-op
    let mut input_str = String::new();
    if io::stdin().read_to_string(&mut input_str).is_err() {
        return Ok(());
    }
    let input = match HookInput::from_json(&input_str) {
        Ok(i) => i,
        Err(e) => {
            tracing::debug!(error = %e, "ignoring unparseable session-start input");
            return Ok(());
        }
    };

    let briefing = session_briefing(&input);
    if !briefing.is_empty() {
        println!("{}", briefing);
    }
    Ok(())
}

pub fn hook_auto_approve() -> anyhow::Result<()> {
    let mut input_str = String::new();
    io::stdin()
        .read_to_string(&mut input_str)
        .context("Error reading hook input")?;
    let input = ToolUseInput::from_json(&input_str).context("Error parsing hook input")?;

    // Silence means the normal permission prompt
    if let Some(decision) = approval_output(&input) {
        println!("{}", decision);
    }
    Ok(())
}

fn approval_output(input: &ToolUseInput) -> Option<serde_json::Value> {
    let approved = should_auto_approve(input);
    tracing::debug!(tool = %input.tool_name, approved, "auto-approve check");
    approved.then(|| serde_json::json!({ "allow": true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::path::PathBuf;

    fn input_for(cwd: &std::path::Path, source: Option<&str>) -> HookInput {
        HookInput {
            session_id: "s".to_string(),
            transcript_path: PathBuf::new(),
            cwd: cwd.to_path_buf(),
            hook_event_name: "SessionStart".to_string(),
            trigger: Trigger::new("SessionStart"),
            source: source.map(String::from),
        }
    }

    #[test]
    #[serial]
    fn test_api_key_prefers_hooks_key() {
        std::env::set_var("ANTHROPIC_API_KEY_HOOKS", "hooks-key");
        std::env::set_var("ANTHROPIC_API_KEY", "main-key");
        assert_eq!(api_key().unwrap(), "hooks-key");

        std::env::remove_var("ANTHROPIC_API_KEY_HOOKS");
        assert_eq!(api_key().unwrap(), "main-key");

        std::env::remove_var("ANTHROPIC_API_KEY");
    }

    #[test]
    #[serial]
    fn test_api_key_missing() {
        std::env::remove_var("ANTHROPIC_API_KEY_HOOKS");
        std::env::set_var("ANTHROPIC_API_KEY", "");
        let err = api_key().unwrap_err();
        assert!(err.to_string().contains("not set"));
        std::env::remove_var("ANTHROPIC_API_KEY");
    }

    #[test]
    fn test_skip_message() {
        let skipped = HandoffOutcome::Skipped { growth: 0.05 };
        assert_eq!(
            describe_outcome(&Trigger::new("SessionEnd"), &skipped),
            "SessionEnd: Skipping (transcript grew 5.0% since PreCompact)"
        );
    }

    #[test]
    fn test_describe_outcome() {
        let trigger = Trigger::new("auto");
        assert!(describe_outcome(&trigger, &HandoffOutcome::NoConversation)
            .contains("No conversation"));
        let written = HandoffOutcome::Written {
            path: PathBuf::from("/p/docs/session_handoffs/20250101-0900-x.md"),
            short_title: "x".to_string(),
        };
        assert_eq!(
            describe_outcome(&trigger, &written),
            "Session handoff saved to: /p/docs/session_handoffs/20250101-0900-x.md"
        );
    }

    #[test]
    fn test_approval_output() {
        let safe = ToolUseInput::from_json(
            r#"{"tool_name": "Bash", "tool_input": {"command": "git status"}}"#,
        )
        .unwrap();
        assert_eq!(approval_output(&safe), Some(serde_json::json!({"allow": true})));
        assert_eq!(
            approval_output(&safe).unwrap().to_string(),
            r#"{"allow":true}"#
        );

        let risky = ToolUseInput::from_json(
            r#"{"tool_name": "Bash", "tool_input": {"command": "sudo rm -rf /"}}"#,
        )
        .unwrap();
        assert!(approval_output(&risky).is_none());
    }

    #[test]
    fn test_session_briefing_without_handoffs() {
        let temp = tempfile::TempDir::new().unwrap();
        assert!(session_briefing(&input_for(temp.path(), None)).is_empty());
        assert!(!temp.path().join("docs").exists());
    }

    #[test]
    fn test_session_briefing_loads_configured_count() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("session_handoffs");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("20250101-0900-old.md"), "# Old").unwrap();
        std::fs::write(dir.join("20250102-0900-new.md"), "# New").unwrap();

        let briefing = session_briefing(&input_for(temp.path(), Some("compact")));
        assert!(briefing.contains("CONTEXT COMPACTED - RESUMING"));
        assert!(briefing.contains("# New"));
        assert!(!briefing.contains("# Old"));

        std::fs::create_dir_all(temp.path().join(".claude")).unwrap();
        std::fs::write(
            temp.path().join(".claude").join("project.json"),
            r#"{"handoffs_to_load": 2}"#,
        )
        .unwrap();
        let briefing = session_briefing(&input_for(temp.path(), None));
        assert!(briefing.contains("SESSION CONTEXT"));
        assert!(briefing.contains("# New"));
        assert!(briefing.contains("# Old"));
    }
}

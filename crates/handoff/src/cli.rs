use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "handoff")]
#[command(version)]
#[command(about = "Session handoff documents for AI coding assistants")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Hook: Write a handoff on PreCompact / SessionEnd (stdin JSON)
    #[command(name = "hook:session-handoff")]
    HookSessionHandoff,

    /// Hook: Print recent handoffs at session start (stdin JSON)
    #[command(name = "hook:session-start")]
    HookSessionStart,

    /// Hook: Auto-approve safe tool calls on PreToolUse (stdin JSON)
    #[command(name = "hook:auto-approve")]
    HookAutoApprove,

    /// Show handoff state
    Status {
        /// Session id to inspect
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Print version information
    Version,
}

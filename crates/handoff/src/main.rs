mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout belongs to the hook host
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::HookSessionHandoff => commands::hooks::hook_session_handoff(),
        Commands::HookSessionStart => commands::hooks::hook_session_start(),
        Commands::HookAutoApprove => commands::hooks::hook_auto_approve(),
        Commands::Status { session } => commands::status::run(session.as_deref()),
        Commands::Version => commands::version::run(),
    }
}

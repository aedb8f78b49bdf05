mod commands;
mod init;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "relay",
    about = "Coordinate terminal-bound agents through a shared mailbox convention"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize the current directory with the relay structure
    Init {
        /// Show what would be done without making changes
        #[arg(long)]
        dry_run: bool,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,

        /// Use the default configuration without prompting
        #[arg(long = "non-interactive", short = 'y')]
        non_interactive: bool,

        /// Pane count (clamped into [2,6]; skips the prompt)
        #[arg(long)]
        count: Option<usize>,

        /// Role-naming preset: officer, agents, or panes
        #[arg(long, conflicts_with = "no_leader")]
        preset: Option<String>,

        /// Make every pane a member (no leader role)
        #[arg(long)]
        no_leader: bool,

        /// Ask the bridge to arrange panes after init
        #[arg(long)]
        auto_split: bool,

        /// Template overlay directory to copy into the target
        #[arg(long)]
        templates: Option<PathBuf>,

        /// Bridge control-plane port
        #[arg(long, default_value_t = relay_bridge::DEFAULT_PORT)]
        bridge_port: u16,
    },

    /// Send a task to a role's queue
    Send {
        /// Recipient role
        to: String,

        /// Sender role
        #[arg(long)]
        from: String,

        /// Task message
        message: String,
    },

    /// File a status report as a role
    Report {
        /// Reporting role
        role: String,

        /// Report status (e.g. working, done, blocked)
        #[arg(long)]
        status: String,

        /// Report message
        message: String,
    },

    /// Append a notification to a role's inbox
    Notify {
        /// Recipient role
        role: String,

        /// Notification message
        message: String,
    },

    /// List a role's pending tasks
    Pending {
        /// Role to inspect
        role: String,
    },

    /// Acknowledge a task by queue position
    Ack {
        /// Role whose queue to update
        role: String,

        /// Task index in the queue
        index: usize,
    },

    /// List a role's filed reports
    Reports {
        /// Role to inspect
        role: String,
    },

    /// List a role's inbox notifications
    Inbox {
        /// Role to inspect
        role: String,
    },

    /// Print the current topology
    Status,

    /// Ask the bridge to arrange panes to match the saved topology
    Arrange {
        /// Bridge control-plane port
        #[arg(long, default_value_t = relay_bridge::DEFAULT_PORT)]
        bridge_port: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let root = std::env::current_dir()?;

    match cli.command {
        Commands::Init {
            dry_run,
            force,
            non_interactive,
            count,
            preset,
            no_leader,
            auto_split,
            templates,
            bridge_port,
        } => {
            init::cmd_init(
                &root,
                init::InitArgs {
                    dry_run,
                    force,
                    non_interactive,
                    count,
                    preset,
                    no_leader,
                    auto_split,
                    templates,
                    bridge_port,
                },
            )
            .await
        }
        Commands::Send { to, from, message } => commands::send(&root, &to, &from, &message),
        Commands::Report {
            role,
            status,
            message,
        } => commands::report(&root, &role, &status, &message),
        Commands::Notify { role, message } => commands::notify(&root, &role, &message),
        Commands::Pending { role } => commands::pending(&root, &role),
        Commands::Ack { role, index } => commands::ack(&root, &role, index),
        Commands::Reports { role } => commands::reports(&root, &role),
        Commands::Inbox { role } => commands::inbox(&root, &role),
        Commands::Status => commands::status(&root),
        Commands::Arrange { bridge_port } => commands::arrange(&root, bridge_port).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_conflicts_with_no_leader() {
        let err = Cli::try_parse_from(["relay", "init", "--preset", "officer", "--no-leader"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn init_flags_parse() {
        Cli::try_parse_from(["relay", "init", "-y", "--count", "4", "--preset", "officer"])
            .unwrap();
    }
}

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use relay_bridge::BridgeClient;
use relay_core::materialize::{MaterializeOptions, MaterializeReport};
use relay_core::roles::{self, RoleStrategy};
use relay_core::{CONFIG_FILE, Topology, materialize, scaffold};

pub struct InitArgs {
    pub dry_run: bool,
    pub force: bool,
    pub non_interactive: bool,
    pub count: Option<usize>,
    pub preset: Option<String>,
    pub no_leader: bool,
    pub auto_split: bool,
    pub templates: Option<PathBuf>,
    pub bridge_port: u16,
}

/// Initialize the target directory with the relay mailbox structure.
pub async fn cmd_init(root: &Path, args: InitArgs) -> Result<()> {
    eprintln!();
    eprintln!("  \x1b[1;32m=== Agent Relay Initializer ===\x1b[0m");
    eprintln!();

    if args.dry_run {
        eprintln!("  \x1b[1;33mDRY RUN - no files will be modified\x1b[0m");
        eprintln!();
    }

    let topology = collect_topology(&args)?;

    eprintln!("  \x1b[1;32mConfiguration:\x1b[0m");
    eprintln!("    Panes: {}", topology.pane_count);
    eprintln!("    Roles: {}", topology.roles.join(", "));
    eprintln!("    First pane is leader: {}", topology.first_pane_is_leader);
    eprintln!();
    eprintln!("  Target directory: {}", root.display());
    eprintln!();

    let opts = MaterializeOptions {
        dry_run: args.dry_run,
        force: args.force,
    };

    eprintln!("  \x1b[1;36mMaterializing mailbox layout...\x1b[0m");
    let report = materialize(root, &topology, &opts)?;
    print_report(&report);

    if let Some(templates) = &args.templates {
        eprintln!();
        eprintln!("  \x1b[1;36mCopying templates from {}...\x1b[0m", templates.display());
        // A missing template source is the one fatal init error.
        let report = scaffold::copy_scaffold(templates, root, &opts)?;
        print_report(&report);
    }

    eprintln!();
    check_bridge(&topology, &args).await;

    print_next_steps(&topology);
    Ok(())
}

/// Resolve the topology from flags, prompting for anything missing.
fn collect_topology(args: &InitArgs) -> Result<Topology> {
    let count = match (args.count, args.non_interactive) {
        (Some(count), _) => roles::clamp_pane_count(count as i64),
        (None, true) => roles::DEFAULT_PANES,
        (None, false) => {
            let answer = prompt("  Pane count [2-6] (default: 3): ")?;
            roles::parse_pane_count(&answer)
        }
    };

    let strategy = match &args.preset {
        Some(preset) => RoleStrategy::Preset(preset.parse().map_err(anyhow::Error::msg)?),
        None => {
            let first_pane_is_leader = if args.no_leader {
                false
            } else if args.non_interactive {
                true
            } else {
                let answer = prompt("  Make pane 0 the leader? (Y/n): ")?;
                !answer.eq_ignore_ascii_case("n")
            };
            RoleStrategy::LeaderFlag {
                first_pane_is_leader,
            }
        }
    };

    let auto_split = if args.auto_split || args.non_interactive {
        args.auto_split
    } else {
        let answer = prompt("  Auto-split panes via the bridge? (y/N): ")?;
        answer.eq_ignore_ascii_case("y")
    };

    Ok(Topology::resolve(count, strategy, auto_split)?)
}

fn prompt(question: &str) -> Result<String> {
    eprint!("{question}");
    std::io::stderr().flush().ok();
    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .context("failed to read input")?;
    Ok(input.trim().to_string())
}

fn print_report(report: &MaterializeReport) {
    for path in &report.created {
        eprintln!("  \x1b[32mCreated: {}\x1b[0m", path.display());
    }
    for path in &report.skipped {
        eprintln!("  \x1b[33mExists (skip): {}\x1b[0m", path.display());
    }
    for path in &report.planned {
        eprintln!("  \x1b[34mWould create: {}\x1b[0m", path.display());
    }
}

/// Probe the bridge and optionally auto-arrange panes. Never fatal:
/// on any failure we print manual fallback instructions and continue.
async fn check_bridge(topology: &Topology, args: &InitArgs) {
    eprintln!("  \x1b[1;36mChecking terminal bridge...\x1b[0m");

    let client = match BridgeClient::new(args.bridge_port) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("  \x1b[1;33mCould not build bridge client: {e}\x1b[0m");
            return;
        }
    };

    match client.probe().await {
        Ok(_) => {
            eprintln!(
                "  \x1b[1;32mBridge is running on port {}\x1b[0m",
                args.bridge_port
            );
            if args.auto_split && !args.dry_run {
                match client.setup(topology.pane_count, &topology.roles).await {
                    Ok(reply) => eprintln!("  \x1b[32m{reply}\x1b[0m"),
                    Err(e) => eprintln!("  \x1b[1;33mAuto-split failed: {e}\x1b[0m"),
                }
            }
        }
        Err(_) => {
            eprintln!(
                "  \x1b[1;33mBridge not responding on port {}\x1b[0m",
                args.bridge_port
            );
            eprintln!("  \x1b[33mStart it with: relay-bridge --port {}\x1b[0m", args.bridge_port);
            eprintln!("  \x1b[33mThen arrange panes with: relay arrange\x1b[0m");
        }
    }
}

fn print_next_steps(topology: &Topology) {
    eprintln!();
    eprintln!("  \x1b[1;32m=== Next Steps ===\x1b[0m");
    eprintln!();
    eprintln!("  1. Open one terminal pane per role:");
    eprintln!("     {}", topology.roles.join(", "));
    eprintln!();
    eprintln!("  2. Point each agent at its instructions:");
    eprintln!("     \"read instructions/<role>.md\"");
    eprintln!();
    eprintln!("  3. Communication commands:");
    eprintln!("     Send task:    relay send <role> --from <me> \"message\"");
    eprintln!("     File report:  relay report <role> --status <status> \"message\"");
    eprintln!("     Check queue:  relay pending <role>");
    eprintln!();
    eprintln!("  \x1b[1;32mReady! Configuration saved to {CONFIG_FILE}\x1b[0m");
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> InitArgs {
        InitArgs {
            dry_run: false,
            force: false,
            non_interactive: true,
            count: None,
            preset: None,
            no_leader: false,
            auto_split: false,
            templates: None,
            bridge_port: relay_bridge::DEFAULT_PORT,
        }
    }

    #[test]
    fn non_interactive_defaults() {
        let topo = collect_topology(&base_args()).unwrap();
        assert_eq!(topo.roles, vec!["leader", "member_1", "member_2"]);
        assert!(topo.first_pane_is_leader);
    }

    #[test]
    fn count_flag_is_clamped() {
        let mut args = base_args();
        args.count = Some(10);
        let topo = collect_topology(&args).unwrap();
        assert_eq!(topo.pane_count, 6);
    }

    #[test]
    fn no_leader_flag() {
        let mut args = base_args();
        args.no_leader = true;
        let topo = collect_topology(&args).unwrap();
        assert_eq!(topo.roles, vec!["member_1", "member_2", "member_3"]);
        assert!(!topo.first_pane_is_leader);
    }

    #[test]
    fn preset_flag_selects_table() {
        let mut args = base_args();
        args.count = Some(4);
        args.preset = Some("officer".to_string());
        let topo = collect_topology(&args).unwrap();
        assert_eq!(topo.roles, vec!["officer", "leader", "member_1", "member_2"]);
    }

    #[test]
    fn bad_preset_is_rejected() {
        let mut args = base_args();
        args.preset = Some("captain".to_string());
        assert!(collect_topology(&args).is_err());
    }

    #[tokio::test]
    async fn init_writes_layout_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = base_args();
        // Unused port: the bridge probe must fail without failing init.
        args.bridge_port = 1;
        cmd_init(dir.path(), args).await.unwrap();

        assert!(dir.path().join("inbox/leader.yaml").exists());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[tokio::test]
    async fn missing_templates_dir_fails_init() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = base_args();
        args.templates = Some(PathBuf::from("/nonexistent/templates"));
        args.bridge_port = 1;
        assert!(cmd_init(dir.path(), args).await.is_err());
    }
}

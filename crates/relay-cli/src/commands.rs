use std::path::Path;

use anyhow::{Context, Result, bail};
use relay_bridge::BridgeClient;
use relay_core::{Mailbox, Topology};

fn load_topology(root: &Path) -> Result<Topology> {
    Topology::load(root).context("failed to load topology")
}

fn require_role(topology: &Topology, role: &str) -> Result<usize> {
    match topology.role_index(role) {
        Some(index) => Ok(index),
        None => bail!(
            "unknown role {role}; configured roles: {}",
            topology.roles.join(", ")
        ),
    }
}

/// Append a task to the recipient's queue and drop a notice in its inbox.
pub fn send(root: &Path, to: &str, from: &str, message: &str) -> Result<()> {
    let topology = load_topology(root)?;
    require_role(&topology, to)?;
    require_role(&topology, from)?;

    let mailbox = Mailbox::new(root, to);
    mailbox.push_task(from, message)?;
    mailbox.push_notice(&format!("new task from {from}"))?;
    println!("task sent to {to}");
    Ok(())
}

pub fn report(root: &Path, role: &str, status: &str, message: &str) -> Result<()> {
    let topology = load_topology(root)?;
    require_role(&topology, role)?;

    Mailbox::new(root, role).push_report(status, message)?;
    println!("report filed for {role} ({status})");
    Ok(())
}

pub fn notify(root: &Path, role: &str, message: &str) -> Result<()> {
    let topology = load_topology(root)?;
    require_role(&topology, role)?;

    Mailbox::new(root, role).push_notice(message)?;
    println!("notified {role}");
    Ok(())
}

pub fn pending(root: &Path, role: &str) -> Result<()> {
    let topology = load_topology(root)?;
    require_role(&topology, role)?;

    let tasks = Mailbox::new(root, role).tasks()?;
    let pending: Vec<_> = tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.pending)
        .collect();
    if pending.is_empty() {
        println!("no pending tasks for {role}");
        return Ok(());
    }
    for (index, task) in pending {
        println!("[{index}] from {}: {}", task.from, task.message);
    }
    Ok(())
}

pub fn ack(root: &Path, role: &str, index: usize) -> Result<()> {
    let topology = load_topology(root)?;
    require_role(&topology, role)?;

    if Mailbox::new(root, role).ack_task(index)? {
        println!("task {index} acknowledged");
    } else {
        bail!("no task at index {index} for {role}");
    }
    Ok(())
}

pub fn reports(root: &Path, role: &str) -> Result<()> {
    let topology = load_topology(root)?;
    require_role(&topology, role)?;

    let reports = Mailbox::new(root, role).reports()?;
    if reports.is_empty() {
        println!("no reports from {role}");
        return Ok(());
    }
    for report in reports {
        println!("[{}] {}: {}", report.sent_at, report.status, report.message);
    }
    Ok(())
}

pub fn inbox(root: &Path, role: &str) -> Result<()> {
    let topology = load_topology(root)?;
    require_role(&topology, role)?;

    let notices = Mailbox::new(root, role).notices()?;
    if notices.is_empty() {
        println!("inbox empty for {role}");
        return Ok(());
    }
    for notice in notices {
        println!("[{}] {}", notice.sent_at, notice.message);
    }
    Ok(())
}

pub fn status(root: &Path) -> Result<()> {
    let topology = load_topology(root)?;
    println!("panes: {}", topology.pane_count);
    for (index, role) in topology.roles.iter().enumerate() {
        println!("  [{index}] {role}");
    }
    println!("first pane is leader: {}", topology.first_pane_is_leader);
    println!("auto split: {}", topology.auto_split);
    println!("created: {}", topology.created_at);
    Ok(())
}

/// Ask the bridge to realize the saved topology's panes.
pub async fn arrange(root: &Path, bridge_port: u16) -> Result<()> {
    let topology = load_topology(root)?;
    let client = BridgeClient::new(bridge_port)?;
    let reply = client
        .setup(topology.pane_count, &topology.roles)
        .await
        .context("bridge unavailable")?;
    println!("{reply}");
    Ok(())
}

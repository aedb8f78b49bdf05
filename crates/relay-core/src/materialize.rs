use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::instructions;
use crate::mailbox::{self, Mailbox};
use crate::topology::Topology;

pub const INSTRUCTIONS_DIR: &str = "instructions";

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterializeOptions {
    /// Record intended actions without touching the filesystem.
    pub dry_run: bool,
    /// Overwrite existing files instead of skipping them.
    pub force: bool,
}

/// What a materialize run did (or would do, under dry-run).
#[derive(Debug, Default)]
pub struct MaterializeReport {
    pub created: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub planned: Vec<PathBuf>,
}

impl MaterializeReport {
    /// True when a run changed nothing and would change nothing.
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.planned.is_empty()
    }
}

/// Materialize the mailbox convention for a topology under `root`.
///
/// Per-file idempotent: existing mailbox and instruction files are
/// skipped unless `force` is set. Re-running never deletes or
/// truncates anything. The topology snapshot is the one exception and
/// is rewritten on every non-dry run.
pub fn materialize(
    root: &Path,
    topology: &Topology,
    opts: &MaterializeOptions,
) -> Result<MaterializeReport> {
    let mut report = MaterializeReport::default();

    for dir in [
        mailbox::INBOX_DIR,
        mailbox::TO_DIR,
        mailbox::FROM_DIR,
        INSTRUCTIONS_DIR,
    ] {
        ensure_dir(&root.join(dir), opts, &mut report)?;
    }

    for (index, role) in topology.roles.iter().enumerate() {
        let mb = Mailbox::new(root, role.as_str());
        let seed = mailbox::empty_seed();

        write_file(&mb.inbox_path(), &seed, opts, &mut report)?;
        if mb.receives_tasks() {
            write_file(&mb.to_path(), &seed, opts, &mut report)?;
            write_file(&mb.from_path(), &seed, opts, &mut report)?;
        }

        let doc = instructions::render(role, index, topology);
        let doc_path = root.join(INSTRUCTIONS_DIR).join(format!("{role}.md"));
        write_file(&doc_path, &doc, opts, &mut report)?;
    }

    let snapshot = Topology::snapshot_path(root);
    if opts.dry_run {
        report.planned.push(snapshot);
    } else {
        topology.save(root)?;
        report.created.push(snapshot);
    }

    Ok(report)
}

fn ensure_dir(dir: &Path, opts: &MaterializeOptions, report: &mut MaterializeReport) -> Result<()> {
    if dir.exists() {
        return Ok(());
    }
    if opts.dry_run {
        report.planned.push(dir.to_path_buf());
        return Ok(());
    }
    std::fs::create_dir_all(dir)?;
    report.created.push(dir.to_path_buf());
    Ok(())
}

fn write_file(
    path: &Path,
    content: &str,
    opts: &MaterializeOptions,
    report: &mut MaterializeReport,
) -> Result<()> {
    if path.exists() && !opts.force {
        report.skipped.push(path.to_path_buf());
        return Ok(());
    }
    if opts.dry_run {
        report.planned.push(path.to_path_buf());
        return Ok(());
    }
    std::fs::write(path, content)?;
    report.created.push(path.to_path_buf());
    Ok(())
}

use std::path::Path;

use crate::error::{RelayError, Result};
use crate::materialize::{MaterializeOptions, MaterializeReport};

/// Copy a template overlay directory into the target root.
///
/// Files are skipped when already present unless `force` is set;
/// directories are created recursively. A missing source directory is
/// fatal (the caller exits non-zero), unlike every already-exists
/// condition.
pub fn copy_scaffold(
    src: &Path,
    dest: &Path,
    opts: &MaterializeOptions,
) -> Result<MaterializeReport> {
    if !src.exists() {
        return Err(RelayError::MissingSource(src.to_path_buf()));
    }
    let mut report = MaterializeReport::default();
    copy_recursive(src, dest, opts, &mut report)?;
    Ok(report)
}

fn copy_recursive(
    src: &Path,
    dest: &Path,
    opts: &MaterializeOptions,
    report: &mut MaterializeReport,
) -> Result<()> {
    if src.is_dir() {
        if !dest.exists() {
            if opts.dry_run {
                report.planned.push(dest.to_path_buf());
            } else {
                std::fs::create_dir_all(dest)?;
                report.created.push(dest.to_path_buf());
            }
        }
        for entry in std::fs::read_dir(src)? {
            let entry = entry?;
            copy_recursive(
                &entry.path(),
                &dest.join(entry.file_name()),
                opts,
                report,
            )?;
        }
        return Ok(());
    }

    if dest.exists() && !opts.force {
        report.skipped.push(dest.to_path_buf());
        return Ok(());
    }
    if opts.dry_run {
        report.planned.push(dest.to_path_buf());
        return Ok(());
    }
    std::fs::copy(src, dest)?;
    report.created.push(dest.to_path_buf());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_templates(root: &Path) {
        std::fs::create_dir_all(root.join("scripts")).unwrap();
        std::fs::write(root.join("scripts/check.sh"), "#!/bin/sh\n").unwrap();
        std::fs::write(root.join("README.md"), "templates\n").unwrap();
    }

    #[test]
    fn copies_tree() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        seed_templates(src.path());

        copy_scaffold(src.path(), dest.path(), &MaterializeOptions::default()).unwrap();
        assert!(dest.path().join("scripts/check.sh").exists());
        assert!(dest.path().join("README.md").exists());
    }

    #[test]
    fn missing_source_is_fatal() {
        let dest = tempfile::tempdir().unwrap();
        let err = copy_scaffold(
            Path::new("/nonexistent/templates"),
            dest.path(),
            &MaterializeOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RelayError::MissingSource(_)));
    }

    #[test]
    fn existing_files_skip_unless_forced() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        seed_templates(src.path());
        std::fs::write(dest.path().join("README.md"), "local edits\n").unwrap();

        copy_scaffold(src.path(), dest.path(), &MaterializeOptions::default()).unwrap();
        assert_eq!(
            std::fs::read_to_string(dest.path().join("README.md")).unwrap(),
            "local edits\n"
        );

        let opts = MaterializeOptions {
            force: true,
            ..Default::default()
        };
        copy_scaffold(src.path(), dest.path(), &opts).unwrap();
        assert_eq!(
            std::fs::read_to_string(dest.path().join("README.md")).unwrap(),
            "templates\n"
        );
    }

    #[test]
    fn dry_run_copies_nothing() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        seed_templates(src.path());

        let opts = MaterializeOptions {
            dry_run: true,
            ..Default::default()
        };
        let report = copy_scaffold(src.path(), dest.path(), &opts).unwrap();
        assert!(!dest.path().join("README.md").exists());
        assert!(!dest.path().join("scripts").exists());
        assert!(!report.planned.is_empty());
    }
}

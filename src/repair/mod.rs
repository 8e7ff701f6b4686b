//! The repair procedure
//!
//! Swaps a corrupted `data` directory for the bundled `backup`, then copies
//! user schemas and the shared tablespace back from the archived copy:
//!
//! 1. validate the root
//! 2. rename `data` to `data_old` (or `data_old_<stamp>` if taken)
//! 3. copy `backup` to `data` (fatal if `backup` is missing)
//! 4. merge non-system schema directories and `ibdata1` from the archive
//!
//! Nothing is ever deleted. A missing backup leaves the root without a
//! `data` directory; the archive is the operator's way back.
//!
//! The running-server check lives in [`crate::guard`] so this module stays
//! free of any operator interaction.

mod entry;
mod fs_ops;

pub use entry::{LogEntry, LogLevel, RepairLog};
pub use fs_ops::{copy_tree, merge_tree, unique_archive_dir, Clock, SystemClock, STAMP_FORMAT};

use crate::error::{RepairError, Result};
use crate::layout::{self, ARCHIVE_BASE, BACKUP_DIR, DATA_DIR, SHARED_TABLESPACE};
use entry::emit;
use fs_ops::copy_file;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Which root the operator picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathChoice {
    #[default]
    Default,
    Custom,
}

impl PathChoice {
    pub fn label(&self) -> &'static str {
        match self {
            PathChoice::Default => "default",
            PathChoice::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOptions {
    pub root: PathBuf,
    pub choice: PathChoice,
}

impl RepairOptions {
    /// Build options from the operator's selection. `custom` is ignored
    /// for [`PathChoice::Default`].
    pub fn resolve(choice: PathChoice, custom: &str) -> Self {
        let root = match choice {
            PathChoice::Default => PathBuf::from(layout::DEFAULT_ROOT),
            PathChoice::Custom => PathBuf::from(custom.trim()),
        };
        Self { root, choice }
    }
}

/// What a successful run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub root: PathBuf,
    /// Where the previous `data` went, if there was one
    pub archive: Option<PathBuf>,
    /// Schemas merged into a directory the backup already provided
    pub merged: Vec<String>,
    /// Schemas copied into `data` fresh
    pub copied: Vec<String>,
    /// System schemas present in the archive but left to the backup
    pub skipped: Vec<String>,
    pub tablespace_restored: bool,
}

/// Run the repair against `opts.root`.
///
/// Errors before any mutation for [`RepairError::InvalidPath`]. A
/// [`RepairError::BackupMissing`] is returned after `data` has already been
/// archived; there is no rollback.
pub fn run_repair(
    opts: &RepairOptions,
    clock: &dyn Clock,
    log: &mut dyn RepairLog,
) -> Result<RepairReport> {
    let root = opts.root.as_path();
    if !root.is_dir() {
        return Err(RepairError::InvalidPath(root.to_path_buf()));
    }

    tracing::info!(root = %root.display(), choice = opts.choice.label(), "starting repair");
    emit(
        log,
        LogEntry::info(format!("Starting repair at: {}", root.display())),
    );

    let mut report = RepairReport {
        root: root.to_path_buf(),
        ..Default::default()
    };

    let data_dir = root.join(DATA_DIR);
    let backup_dir = root.join(BACKUP_DIR);

    report.archive = archive_live_data(root, &data_dir, clock, log)?;

    if !backup_dir.is_dir() {
        emit(log, LogEntry::error("'backup' directory not found."));
        return Err(RepairError::BackupMissing(backup_dir));
    }
    let files = copy_tree(&backup_dir, &data_dir)?;
    tracing::debug!(files, "backup installed");
    emit(log, LogEntry::success("'backup' copied to 'data'"));

    match report.archive.clone() {
        Some(archive) => merge_back(&archive, &data_dir, &mut report, log)?,
        None => emit(
            log,
            LogEntry::warning("No 'data_old' created. Skipping DB copy."),
        ),
    }

    emit(log, LogEntry::success("Repair completed successfully!"));
    Ok(report)
}

fn archive_live_data(
    root: &Path,
    data_dir: &Path,
    clock: &dyn Clock,
    log: &mut dyn RepairLog,
) -> Result<Option<PathBuf>> {
    if !data_dir.exists() {
        emit(log, LogEntry::error("'data' folder not found."));
        return Ok(None);
    }

    let mut archive = root.join(ARCHIVE_BASE);
    if archive.exists() {
        archive = unique_archive_dir(root, ARCHIVE_BASE, clock);
        emit(
            log,
            LogEntry::warning(format!(
                "'{}' exists. Renaming to {}",
                ARCHIVE_BASE,
                archive.display()
            )),
        );
    } else {
        emit(
            log,
            LogEntry::step(format!("Renaming '{}' to '{}'", DATA_DIR, ARCHIVE_BASE)),
        );
    }

    fs::rename(data_dir, &archive).map_err(|e| {
        RepairError::io(
            format!(
                "Failed to rename {} to {}",
                data_dir.display(),
                archive.display()
            ),
            e,
        )
    })?;
    Ok(Some(archive))
}

fn merge_back(
    archive: &Path,
    data_dir: &Path,
    report: &mut RepairReport,
    log: &mut dyn RepairLog,
) -> Result<()> {
    let entries = fs::read_dir(archive)
        .map_err(|e| RepairError::io(format!("Failed to read {}", archive.display()), e))?;

    let mut schemas = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| RepairError::io(format!("Failed to read {}", archive.display()), e))?;
        // is_dir follows symlinks, matching how the tree copy treats them
        if !entry.path().is_dir() {
            continue;
        }
        schemas.push(entry.file_name().to_string_lossy().into_owned());
    }
    // read_dir order is platform dependent; keep the log stable
    schemas.sort();

    for name in schemas {
        if layout::is_excluded(&name) {
            tracing::debug!(schema = %name, "system schema left to backup");
            report.skipped.push(name);
            continue;
        }

        let src = archive.join(&name);
        let dst = data_dir.join(&name);
        if dst.exists() {
            merge_tree(&src, &dst)?;
            emit(log, LogEntry::step(format!("Merged {} into 'data'", name)));
            report.merged.push(name);
        } else {
            copy_tree(&src, &dst)?;
            emit(log, LogEntry::step(format!("Copied {} to 'data'", name)));
            report.copied.push(name);
        }
    }

    let tablespace = archive.join(SHARED_TABLESPACE);
    if tablespace.is_file() {
        let target = data_dir.join(SHARED_TABLESPACE);
        copy_file(&tablespace, &target)?;
        report.tablespace_restored = true;
        emit(
            log,
            LogEntry::success(format!("'{}' copied successfully.", SHARED_TABLESPACE)),
        );
    } else {
        emit(
            log,
            LogEntry::warning(format!(
                "'{}' not found in '{}'.",
                SHARED_TABLESPACE,
                archive
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| ARCHIVE_BASE.to_string())
            )),
        );
    }

    Ok(())
}

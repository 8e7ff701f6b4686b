//! Directory tree helpers: copy, merge, and collision-free archive names

use crate::error::{RepairError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use walkdir::WalkDir;

/// Timestamp suffix format for archive directories (`20240131_235959`)
pub const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

const COLLISION_BACKOFF: Duration = Duration::from_secs(1);

/// Source of archive timestamps. Tests swap in a scripted clock.
pub trait Clock {
    fn stamp(&self) -> String;
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn stamp(&self) -> String {
        chrono::Local::now().format(STAMP_FORMAT).to_string()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Pick `<root>/<base>_<stamp>` that does not exist yet.
///
/// Stamps have one-second granularity, so on a collision we wait a second
/// and ask the clock again.
pub fn unique_archive_dir(root: &Path, base: &str, clock: &dyn Clock) -> PathBuf {
    let mut candidate = root.join(format!("{}_{}", base, clock.stamp()));
    while candidate.exists() {
        tracing::debug!(candidate = %candidate.display(), "archive name taken, retrying");
        clock.sleep(COLLISION_BACKOFF);
        candidate = root.join(format!("{}_{}", base, clock.stamp()));
    }
    candidate
}

/// Recursively copy `src` into a new directory `dst`.
///
/// Fails if `dst` already exists. Returns the number of files written.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<u64> {
    if dst.exists() {
        return Err(RepairError::io(
            format!("Refusing to copy over {}", dst.display()),
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "destination exists"),
        ));
    }
    write_tree(src, dst)
}

/// Recursively copy `src` into `dst`, reusing existing directories and
/// overwriting files that share a relative path.
pub fn merge_tree(src: &Path, dst: &Path) -> Result<u64> {
    write_tree(src, dst)
}

/// Copy one file, keeping its modification time when the platform allows it.
pub(crate) fn copy_file(src: &Path, dst: &Path) -> Result<u64> {
    let bytes = fs::copy(src, dst).map_err(|e| {
        RepairError::io(
            format!("Failed to copy {} to {}", src.display(), dst.display()),
            e,
        )
    })?;
    if let Err(e) = copy_modified_time(src, dst) {
        tracing::debug!(error = %e, path = %dst.display(), "modification time not kept");
    }
    Ok(bytes)
}

fn copy_modified_time(src: &Path, dst: &Path) -> std::io::Result<()> {
    let modified = fs::metadata(src)?.modified()?;
    // read-only copies can still take a timestamp on unix
    let file = fs::OpenOptions::new()
        .write(true)
        .open(dst)
        .or_else(|_| fs::File::open(dst))?;
    file.set_modified(modified)
}

fn write_tree(src: &Path, dst: &Path) -> Result<u64> {
    if !src.is_dir() {
        return Err(RepairError::io(
            format!("Cannot copy {}", src.display()),
            std::io::Error::new(std::io::ErrorKind::NotADirectory, "source is not a directory"),
        ));
    }
    fs::create_dir_all(dst)
        .map_err(|e| RepairError::io(format!("Failed to create {}", dst.display()), e))?;

    let mut files = 0u64;
    for entry in WalkDir::new(src).follow_links(true).min_depth(1) {
        let entry = entry.map_err(|e| {
            RepairError::io(format!("Failed to read {}", src.display()), e.into())
        })?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| RepairError::io(format!("Failed to create {}", target.display()), e))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| RepairError::io(format!("Failed to create {}", parent.display()), e))?;
        }
        copy_file(entry.path(), &target)?;
        files += 1;
    }

    Ok(files)
}

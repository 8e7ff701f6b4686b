//! Error types for the repair procedure and its OS glue

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, RepairError>;

#[derive(Error, Debug)]
pub enum RepairError {
    #[error("Selected XAMPP MySQL directory is invalid: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("'backup' directory not found at {}", .0.display())]
    BackupMissing(PathBuf),

    #[error("MySQL appears to be running ({})", .0.join(", "))]
    ServerRunning(Vec<String>),

    #[error("Failed to query the process table: {0}")]
    ProcessQuery(String),

    #[error("Failed to kill PID {pid}: {reason}")]
    Termination { pid: u32, reason: String },

    #[error("Please enter a valid PID. Got '{0}'")]
    InvalidPid(String),

    #[error("Please enter a valid port. Got '{0}'")]
    InvalidPort(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl RepairError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        RepairError::Io {
            context: context.into(),
            source,
        }
    }

    /// Short dialog title for the terminal UI
    pub fn title(&self) -> &'static str {
        match self {
            RepairError::InvalidPath(_) => "Invalid Path",
            RepairError::BackupMissing(_) => "Backup Missing",
            RepairError::ServerRunning(_) => "MySQL is Running",
            RepairError::ProcessQuery(_) => "Process Query Failed",
            RepairError::Termination { .. }
            | RepairError::InvalidPid(_)
            | RepairError::InvalidPort(_) => "Error",
            RepairError::Io { .. } => "Filesystem Error",
        }
    }
}

//! Running-server guard
//!
//! Working on files held open by a live `mysqld` corrupts them, so the
//! repair is only started once the process table is clear. When it is not,
//! the decision belongs to the operator: abort, or go look at who holds the
//! port and stop it by hand. This module only reports and maps decisions;
//! it never shows a dialog.

use crate::error::RepairError;
use crate::repair::{LogEntry, RepairLog};

/// Anything that can list the names of running processes
pub trait ProcessTable {
    fn running_processes(&self) -> Result<Vec<String>, RepairError>;
}

/// Result of looking at the process table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preflight {
    Clear,
    ServerRunning { matches: Vec<String> },
}

/// What the operator answered when told the server is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorChoice {
    Decline,
    InspectPorts,
}

/// Final word on whether the repair may start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardStatus {
    Proceed,
    Abort,
    /// Operator wants to stop the server first; repair must be re-triggered
    NeedsManualIntervention,
}

impl Preflight {
    pub fn is_clear(&self) -> bool {
        matches!(self, Preflight::Clear)
    }

    pub fn resolve(&self, choice: Option<OperatorChoice>) -> GuardStatus {
        match (self, choice) {
            (Preflight::Clear, _) => GuardStatus::Proceed,
            (Preflight::ServerRunning { .. }, Some(OperatorChoice::InspectPorts)) => {
                GuardStatus::NeedsManualIntervention
            }
            (Preflight::ServerRunning { .. }, _) => GuardStatus::Abort,
        }
    }

    /// Turn a running server into the matching error, for callers that
    /// cannot ask anyone.
    pub fn into_result(self) -> Result<(), RepairError> {
        match self {
            Preflight::Clear => Ok(()),
            Preflight::ServerRunning { matches } => Err(RepairError::ServerRunning(matches)),
        }
    }
}

/// Case-insensitive substring match of `needle` against process names
pub fn process_matches(names: &[String], needle: &str) -> Vec<String> {
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    names
        .iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Check whether the database server is running.
///
/// A failing process query is not fatal: it is logged as a warning and
/// treated as "not running".
pub fn preflight(table: &dyn ProcessTable, needle: &str, log: &mut dyn RepairLog) -> Preflight {
    match table.running_processes() {
        Ok(names) => {
            let matches = process_matches(&names, needle);
            if matches.is_empty() {
                Preflight::Clear
            } else {
                tracing::warn!(?matches, "database server is running");
                Preflight::ServerRunning { matches }
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "status check failed, assuming server is stopped");
            log.record(LogEntry::warning(format!(
                "Error checking MySQL status: {}",
                err
            )));
            Preflight::Clear
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticTable(Result<Vec<&'static str>, &'static str>);

    impl ProcessTable for StaticTable {
        fn running_processes(&self) -> Result<Vec<String>, RepairError> {
            match &self.0 {
                Ok(names) => Ok(names.iter().map(|n| n.to_string()).collect()),
                Err(e) => Err(RepairError::ProcessQuery(e.to_string())),
            }
        }
    }

    #[test]
    fn test_matches_case_insensitively() {
        let names = vec![
            "explorer.exe".to_string(),
            "MYSQLD.EXE".to_string(),
            "httpd.exe".to_string(),
        ];
        assert_eq!(process_matches(&names, "mysqld"), vec!["MYSQLD.EXE"]);
        assert!(process_matches(&names, "").is_empty());
    }

    #[test]
    fn test_preflight_clear_and_running() {
        let mut log: Vec<LogEntry> = Vec::new();
        let clear = preflight(&StaticTable(Ok(vec!["bash", "sshd"])), "mysqld", &mut log);
        assert_eq!(clear, Preflight::Clear);

        let running = preflight(&StaticTable(Ok(vec!["mysqld"])), "mysqld", &mut log);
        assert_eq!(
            running,
            Preflight::ServerRunning {
                matches: vec!["mysqld".to_string()]
            }
        );
        assert!(log.is_empty());
    }

    #[test]
    fn test_query_failure_is_warning_and_clear() {
        let mut log: Vec<LogEntry> = Vec::new();
        let result = preflight(&StaticTable(Err("tasklist missing")), "mysqld", &mut log);
        assert_eq!(result, Preflight::Clear);
        assert_eq!(log.len(), 1);
        assert!(log[0].message.starts_with("Error checking MySQL status"));
    }

    #[test]
    fn test_resolve_maps_operator_choice() {
        let running = Preflight::ServerRunning {
            matches: vec!["mysqld.exe".to_string()],
        };
        assert_eq!(running.resolve(None), GuardStatus::Abort);
        assert_eq!(
            running.resolve(Some(OperatorChoice::Decline)),
            GuardStatus::Abort
        );
        assert_eq!(
            running.resolve(Some(OperatorChoice::InspectPorts)),
            GuardStatus::NeedsManualIntervention
        );
        assert_eq!(
            Preflight::Clear.resolve(Some(OperatorChoice::Decline)),
            GuardStatus::Proceed
        );
    }

    #[test]
    fn test_into_result() {
        assert!(Preflight::Clear.into_result().is_ok());
        let err = Preflight::ServerRunning {
            matches: vec!["mysqld".to_string()],
        }
        .into_result()
        .unwrap_err();
        assert!(matches!(err, RepairError::ServerRunning(_)));
    }
}

//! Controller between the terminal UI and the repair core
//!
//! Every operator action lands here as a plain function over [`App`] and a
//! [`RuntimeContext`]. The OS is reached only through the context's trait
//! objects, so the whole flow runs against fakes in tests.

pub mod input;
pub mod runtime;

pub use runtime::run_tui;

use crate::error::RepairError;
use crate::guard::{self, OperatorChoice, Preflight, ProcessTable};
use crate::repair::{self, Clock, LogEntry};
use crate::system::{self, PortInspector};
use crate::ui::{AlertKind, App, Overlay, ToastKind};

pub struct RuntimeContext<'a> {
    pub processes: &'a dyn ProcessTable,
    pub ports: &'a dyn PortInspector,
    pub clock: &'a dyn Clock,
}

/// `r`: check for a live server, then repair or ask the operator
pub fn trigger_repair(app: &mut App, ctx: &RuntimeContext) {
    app.finish_editing_path();

    let mut entries = Vec::new();
    let preflight = guard::preflight(ctx.processes, &app.config.server_process, &mut entries);
    app.extend_log(entries);

    match preflight {
        Preflight::Clear => run_now(app, ctx),
        Preflight::ServerRunning { matches } => app.show_server_running(matches),
    }
}

/// Answer to the "MySQL is running" prompt
pub fn answer_server_prompt(app: &mut App, choice: OperatorChoice) {
    let matches = match &app.overlay {
        Overlay::ServerRunning { matches } => matches.clone(),
        _ => return,
    };

    match (Preflight::ServerRunning { matches }).resolve(Some(choice)) {
        guard::GuardStatus::Abort => {
            app.append_log(LogEntry::warning("Operation cancelled by user."));
            app.replace_with_alert("Aborted", "Operation cancelled by user.", AlertKind::Info);
        }
        guard::GuardStatus::NeedsManualIntervention => {
            app.append_log(LogEntry::info(
                "Stop the MySQL server, then run the repair again.",
            ));
            app.open_port_inspector();
        }
        guard::GuardStatus::Proceed => app.close_overlay(),
    }
}

/// Run the repair for the on-screen selection. Blocks the UI until done.
pub fn run_now(app: &mut App, ctx: &RuntimeContext) {
    let opts = app.repair_options();
    let mut entries = Vec::new();
    let result = repair::run_repair(&opts, ctx.clock, &mut entries);
    app.extend_log(entries);

    match result {
        Ok(report) => {
            tracing::info!(
                merged = report.merged.len(),
                copied = report.copied.len(),
                skipped = report.skipped.len(),
                "repair finished"
            );
            app.remember_selection();
            app.show_toast("Repair completed successfully!", ToastKind::Success);
        }
        Err(RepairError::InvalidPath(path)) => {
            tracing::warn!(path = %path.display(), "invalid root");
            app.replace_with_alert(
                "Invalid Path",
                "Selected XAMPP MySQL directory is invalid.",
                AlertKind::Error,
            );
        }
        Err(err @ RepairError::BackupMissing(_)) => {
            tracing::error!(error = %err, "repair halted");
            app.show_toast(&err.to_string(), ToastKind::Error);
        }
        Err(err) => {
            tracing::error!(error = %err, "repair failed");
            app.append_log(LogEntry::error(err.to_string()));
            app.show_toast(err.title(), ToastKind::Error);
        }
    }
}

/// Port inspector: list connections on the entered port
pub fn find_connections(app: &mut App, ctx: &RuntimeContext) {
    let Some(state) = app.port_inspector_mut() else {
        return;
    };
    let port = match system::parse_port(&state.port_input) {
        Ok(port) => port,
        Err(_) => {
            app.show_alert("Error", "Please enter a valid port.", AlertKind::Error);
            return;
        }
    };

    match ctx.ports.connections(port) {
        Ok(rows) => {
            let text = system::describe_connections(port, &rows);
            if let Some(state) = app.port_inspector_mut() {
                state.output = text;
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, port, "connection lookup failed");
            app.show_error_alert(&err);
        }
    }
}

/// Port inspector: forcefully terminate the entered PID
pub fn kill_process(app: &mut App, ctx: &RuntimeContext) {
    let Some(state) = app.port_inspector_mut() else {
        return;
    };
    let pid = match system::parse_pid(&state.pid_input) {
        Ok(pid) => pid,
        Err(_) => {
            app.show_alert("Error", "Please enter a valid PID.", AlertKind::Error);
            return;
        }
    };

    match ctx.ports.terminate(pid) {
        Ok(()) => {
            tracing::info!(pid, "process terminated");
            let message = format!("Process {} has been terminated.", pid);
            app.append_log(LogEntry::success(message.clone()));
            app.replace_with_alert("Success", &message, AlertKind::Success);
        }
        Err(err) => {
            tracing::warn!(error = %err, pid, "termination failed");
            app.show_error_alert(&err);
        }
    }
}

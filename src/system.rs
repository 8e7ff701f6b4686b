//! OS process and port glue
//!
//! Thin wrappers around the platform tools an operator would run by hand:
//! `tasklist` / `netstat -aon` / `taskkill` on Windows, `ps` / `lsof` /
//! `kill` elsewhere. Output parsing is kept in plain functions so it can
//! be tested without the tools installed.

use crate::error::RepairError;
use crate::guard::ProcessTable;
use crate::util::{run_command_with_timeout, CommandRunResult};
use std::process::Command;
use std::time::Duration;

const COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// One row of the active-connection table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub proto: String,
    pub local: String,
    pub remote: String,
    pub state: String,
    pub pid: Option<u32>,
    /// Owning command name, when the platform tool reports it
    pub command: Option<String>,
}

impl Connection {
    pub fn display_line(&self) -> String {
        let pid = self
            .pid
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        let mut line = format!(
            "{:<5} {:<24} {:<24} {:<12} {}",
            self.proto, self.local, self.remote, self.state, pid
        );
        if let Some(command) = &self.command {
            line.push_str("  ");
            line.push_str(command);
        }
        line.trim_end().to_string()
    }
}

/// Port lookup and forced termination
pub trait PortInspector {
    fn connections(&self, port: u16) -> Result<Vec<Connection>, RepairError>;
    fn terminate(&self, pid: u32) -> Result<(), RepairError>;
}

/// Render a lookup result for the dialog / CLI
pub fn describe_connections(port: u16, connections: &[Connection]) -> String {
    if connections.is_empty() {
        return format!("No active connections found on port {}", port);
    }
    connections
        .iter()
        .map(Connection::display_line)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn parse_pid(input: &str) -> Result<u32, RepairError> {
    let trimmed = input.trim();
    match trimmed.parse::<u32>() {
        Ok(pid) if pid > 0 => Ok(pid),
        _ => Err(RepairError::InvalidPid(trimmed.to_string())),
    }
}

pub fn parse_port(input: &str) -> Result<u16, RepairError> {
    let trimmed = input.trim();
    match trimmed.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(RepairError::InvalidPort(trimmed.to_string())),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  SYSTEM IMPLEMENTATIONS
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcesses;

impl ProcessTable for SystemProcesses {
    fn running_processes(&self) -> Result<Vec<String>, RepairError> {
        let result = run_tool(process_list_command()).map_err(RepairError::ProcessQuery)?;
        if !result.success() {
            return Err(RepairError::ProcessQuery(result.diagnostic()));
        }
        if cfg!(windows) {
            Ok(parse_tasklist_csv(&result.stdout))
        } else {
            Ok(parse_ps(&result.stdout))
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPorts;

impl PortInspector for SystemPorts {
    fn connections(&self, port: u16) -> Result<Vec<Connection>, RepairError> {
        let result = run_tool(connection_command(port)).map_err(RepairError::ProcessQuery)?;

        let rows = if cfg!(windows) {
            if !result.success() {
                return Err(RepairError::ProcessQuery(result.diagnostic()));
            }
            parse_netstat(&result.stdout)
        } else {
            // lsof exits 1 when nothing matched
            if result.timed_out || (!result.success() && !result.stderr.trim().is_empty()) {
                return Err(RepairError::ProcessQuery(result.diagnostic()));
            }
            parse_lsof(&result.stdout)
        };

        let rows = filter_by_port(rows, port);
        tracing::info!(port, count = rows.len(), "port lookup");
        Ok(rows)
    }

    fn terminate(&self, pid: u32) -> Result<(), RepairError> {
        let result = run_tool(kill_command(pid)).map_err(|reason| RepairError::Termination {
            pid,
            reason,
        })?;
        if !result.success() {
            return Err(RepairError::Termination {
                pid,
                reason: result.diagnostic(),
            });
        }
        tracing::warn!(pid, "process terminated");
        Ok(())
    }
}

fn run_tool(mut command: Command) -> Result<CommandRunResult, String> {
    tracing::debug!(?command, "running system tool");
    run_command_with_timeout(&mut command, COMMAND_TIMEOUT)
}

#[cfg(windows)]
fn process_list_command() -> Command {
    let mut cmd = Command::new("tasklist");
    cmd.args(["/FO", "CSV", "/NH"]);
    cmd
}

#[cfg(not(windows))]
fn process_list_command() -> Command {
    let mut cmd = Command::new("ps");
    cmd.args(["-A", "-o", "comm="]);
    cmd
}

#[cfg(windows)]
fn connection_command(_port: u16) -> Command {
    let mut cmd = Command::new("netstat");
    cmd.arg("-aon");
    cmd
}

#[cfg(not(windows))]
fn connection_command(port: u16) -> Command {
    let mut cmd = Command::new("lsof");
    cmd.args(["-nP", "-i"]).arg(format!(":{}", port));
    cmd
}

#[cfg(windows)]
fn kill_command(pid: u32) -> Command {
    let mut cmd = Command::new("taskkill");
    cmd.arg("/PID").arg(pid.to_string()).arg("/F");
    cmd
}

#[cfg(not(windows))]
fn kill_command(pid: u32) -> Command {
    let mut cmd = Command::new("kill");
    cmd.arg("-9").arg(pid.to_string());
    cmd
}

// ═══════════════════════════════════════════════════════════════════════════
//  PARSERS
// ═══════════════════════════════════════════════════════════════════════════

/// Image names from `tasklist /FO CSV /NH`
pub fn parse_tasklist_csv(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let rest = line.strip_prefix('"')?;
            let end = rest.find('"')?;
            let name = &rest[..end];
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

/// Command names from `ps -A -o comm=`; full paths are reduced to the file name
pub fn parse_ps(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.rsplit('/').next().unwrap_or(line).to_string())
        .collect()
}

/// Rows of `netstat -aon`
pub fn parse_netstat(output: &str) -> Vec<Connection> {
    output
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let proto = *fields.first()?;
            if !proto.eq_ignore_ascii_case("tcp") && !proto.eq_ignore_ascii_case("udp") {
                return None;
            }
            // UDP rows have no state column
            let (state, pid) = match fields.len() {
                5 => (fields[3], fields[4]),
                4 => ("", fields[3]),
                _ => return None,
            };
            Some(Connection {
                proto: proto.to_uppercase(),
                local: fields[1].to_string(),
                remote: fields[2].to_string(),
                state: state.to_string(),
                pid: pid.parse().ok(),
                command: None,
            })
        })
        .collect()
}

/// Rows of `lsof -nP -i :<port>`
pub fn parse_lsof(output: &str) -> Vec<Connection> {
    output
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 9 || fields[0] == "COMMAND" {
                return None;
            }
            let name = fields[8];
            let (local, remote) = match name.split_once("->") {
                Some((l, r)) => (l.to_string(), r.to_string()),
                None => (name.to_string(), "*:*".to_string()),
            };
            let state = fields
                .get(9)
                .map(|s| s.trim_start_matches('(').trim_end_matches(')').to_string())
                .unwrap_or_default();
            Some(Connection {
                proto: fields[7].to_uppercase(),
                local,
                remote,
                state,
                pid: fields[1].parse().ok(),
                command: Some(fields[0].to_string()),
            })
        })
        .collect()
}

fn address_port(address: &str) -> Option<u16> {
    address.rsplit(':').next()?.parse().ok()
}

/// Keep rows whose local or remote address uses exactly `port`
pub fn filter_by_port(rows: Vec<Connection>, port: u16) -> Vec<Connection> {
    rows.into_iter()
        .filter(|c| address_port(&c.local) == Some(port) || address_port(&c.remote) == Some(port))
        .collect()
}

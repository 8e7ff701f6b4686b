use anyhow::Result;
use clap::Parser;
use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use xampp_mechanic::config::Config;
use xampp_mechanic::guard;
use xampp_mechanic::repair::{self, LogEntry, PathChoice, RepairOptions, SystemClock};
use xampp_mechanic::system::{self, PortInspector, SystemPorts, SystemProcesses};

#[derive(Parser, Debug)]
#[command(
    name = "xampp-mechanic",
    about = "Swap a broken XAMPP MySQL data directory for its backup",
    version
)]
struct Args {
    /// MySQL directory to work on (defaults to C:/xampp/mysql)
    #[arg(value_name = "ROOT", conflicts_with = "root")]
    path: Option<PathBuf>,

    /// Same as ROOT
    #[arg(long, value_name = "PATH")]
    root: Option<PathBuf>,

    /// Run the repair without the interactive UI
    #[arg(long)]
    repair: bool,

    /// Print the connections on a port (defaults to the configured port)
    #[arg(long, value_name = "PORT", num_args = 0..=1)]
    inspect_port: Option<Option<u16>>,

    /// Forcefully terminate a process
    #[arg(long, value_name = "PID", conflicts_with_all = ["repair", "inspect_port"])]
    kill: Option<String>,
}

impl Args {
    fn headless(&self) -> bool {
        self.repair || self.inspect_port.is_some() || self.kill.is_some()
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(!args.headless());

    let config = Config::load();
    // used for this run only; the stored selection stays as it was
    let root_override = args.path.as_deref().or(args.root.as_deref());

    if let Some(pid) = &args.kill {
        let pid = system::parse_pid(pid)?;
        SystemPorts.terminate(pid)?;
        println!("Process {} has been terminated.", pid);
        return Ok(());
    }

    if let Some(port) = args.inspect_port {
        let port = port.unwrap_or(config.inspect_port);
        let rows = SystemPorts.connections(port)?;
        println!("{}", system::describe_connections(port, &rows));
        return Ok(());
    }

    if args.repair {
        let opts = match root_override {
            Some(root) => RepairOptions::resolve(PathChoice::Custom, &root.display().to_string()),
            None => config.repair_options(),
        };
        return repair_headless(&opts, &config);
    }

    xampp_mechanic::app::run_tui(config, root_override)
}

fn repair_headless(opts: &RepairOptions, config: &Config) -> Result<()> {
    let mut print = |entry: LogEntry| println!("{}", entry.display_line());

    guard::preflight(&SystemProcesses, &config.server_process, &mut print).into_result()?;
    let report = repair::run_repair(opts, &SystemClock, &mut print)?;

    tracing::info!(
        root = %report.root.display(),
        archive = ?report.archive,
        merged = ?report.merged,
        copied = ?report.copied,
        skipped = ?report.skipped,
        tablespace_restored = report.tablespace_restored,
        "headless repair finished"
    );
    Ok(())
}

/// Traces go to stderr in headless modes. While the UI owns the terminal
/// they go to a file instead, or nowhere if it cannot be opened.
fn init_tracing(tui: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("xampp_mechanic=info"));

    if !tui {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .try_init();
        return;
    }

    if let Some(file) = open_log_file() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
    }
}

fn open_log_file() -> Option<File> {
    let dir = dirs::data_local_dir()?.join("xampp-mechanic");
    fs::create_dir_all(&dir).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("mechanic.log"))
        .ok()
}

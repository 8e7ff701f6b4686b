//! Running-server guard driven through the UI controller with fake OS glue

use std::cell::RefCell;
use std::fs;
use std::time::Duration;
use xampp_mechanic::app::{self, RuntimeContext};
use xampp_mechanic::config::Config;
use xampp_mechanic::guard::{self, GuardStatus, OperatorChoice, Preflight, ProcessTable};
use xampp_mechanic::repair::{Clock, LogEntry, LogLevel, PathChoice};
use xampp_mechanic::system::{Connection, PortInspector};
use xampp_mechanic::ui::{App, Overlay};
use xampp_mechanic::RepairError;

/// Process table whose contents the test can change between steps
struct FakeTable {
    names: RefCell<Result<Vec<String>, String>>,
}

impl FakeTable {
    fn running(names: &[&str]) -> Self {
        Self {
            names: RefCell::new(Ok(names.iter().map(|s| s.to_string()).collect())),
        }
    }

    fn failing(reason: &str) -> Self {
        Self {
            names: RefCell::new(Err(reason.to_string())),
        }
    }

    fn set(&self, names: &[&str]) {
        *self.names.borrow_mut() = Ok(names.iter().map(|s| s.to_string()).collect());
    }
}

impl ProcessTable for FakeTable {
    fn running_processes(&self) -> Result<Vec<String>, RepairError> {
        self.names
            .borrow()
            .clone()
            .map_err(RepairError::ProcessQuery)
    }
}

/// One listener that dies when killed
struct FakePorts {
    table: FakeTableHandle,
    listener_pid: u32,
}

type FakeTableHandle = std::rc::Rc<FakeTable>;

impl PortInspector for FakePorts {
    fn connections(&self, port: u16) -> Result<Vec<Connection>, RepairError> {
        let alive = matches!(&*self.table.names.borrow(), Ok(names) if !names.is_empty());
        if !alive || port != 3306 {
            return Ok(Vec::new());
        }
        Ok(vec![Connection {
            proto: "TCP".to_string(),
            local: "127.0.0.1:3306".to_string(),
            remote: "0.0.0.0:0".to_string(),
            state: "LISTENING".to_string(),
            pid: Some(self.listener_pid),
            command: Some("mysqld".to_string()),
        }])
    }

    fn terminate(&self, pid: u32) -> Result<(), RepairError> {
        if pid != self.listener_pid {
            return Err(RepairError::Termination {
                pid,
                reason: "no such process".to_string(),
            });
        }
        self.table.set(&[]);
        Ok(())
    }
}

struct FixedClock;

impl Clock for FixedClock {
    fn stamp(&self) -> String {
        "20240101_120000".to_string()
    }
    fn sleep(&self, _: Duration) {}
}

fn app_for(root: &std::path::Path) -> App {
    let config = Config {
        path_choice: PathChoice::Custom,
        custom_root: Some(root.to_path_buf()),
        ..Config::default()
    };
    App::new(config)
}

#[test]
fn preflight_maps_operator_choices() {
    let mut log: Vec<LogEntry> = Vec::new();
    let running = guard::preflight(&FakeTable::running(&["MYSQLD.EXE"]), "mysqld", &mut log);

    assert_eq!(running.resolve(None), GuardStatus::Abort);
    assert_eq!(running.resolve(Some(OperatorChoice::Decline)), GuardStatus::Abort);
    assert_eq!(
        running.resolve(Some(OperatorChoice::InspectPorts)),
        GuardStatus::NeedsManualIntervention
    );
    assert!(matches!(
        running.into_result(),
        Err(RepairError::ServerRunning(names)) if names == vec!["MYSQLD.EXE".to_string()]
    ));

    let clear = guard::preflight(&FakeTable::running(&["httpd.exe"]), "mysqld", &mut log);
    assert_eq!(clear, Preflight::Clear);
    assert_eq!(clear.resolve(Some(OperatorChoice::Decline)), GuardStatus::Proceed);
    assert!(log.is_empty());
}

#[test]
fn kill_then_retrigger_runs_the_repair() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir_all(root.path().join("backup/mysql")).unwrap();
    fs::create_dir_all(root.path().join("data/shop_db")).unwrap();

    let table = std::rc::Rc::new(FakeTable::running(&["mysqld.exe"]));
    let ports = FakePorts {
        table: table.clone(),
        listener_pid: 4242,
    };
    let ctx = RuntimeContext {
        processes: table.as_ref(),
        ports: &ports,
        clock: &FixedClock,
    };
    let mut app = app_for(root.path());

    app::trigger_repair(&mut app, &ctx);
    assert!(matches!(app.overlay, Overlay::ServerRunning { .. }));
    assert!(!root.path().join("data_old").exists());

    app::answer_server_prompt(&mut app, OperatorChoice::InspectPorts);
    app::find_connections(&mut app, &ctx);
    match &app.overlay {
        Overlay::PortInspector(state) => assert!(state.output.contains("4242")),
        other => panic!("unexpected overlay {:?}", other),
    }

    app.port_inspector_mut().unwrap().pid_input = "4242".to_string();
    app::kill_process(&mut app, &ctx);
    match &app.overlay {
        Overlay::Alert { title, message, .. } => {
            assert_eq!(title, "Success");
            assert_eq!(message, "Process 4242 has been terminated.");
        }
        other => panic!("unexpected overlay {:?}", other),
    }
    app.close_overlay();
    assert_eq!(app.overlay, Overlay::None);

    // Nothing was repaired until the operator asks again
    assert!(!root.path().join("data_old").exists());

    app::trigger_repair(&mut app, &ctx);
    assert!(root.path().join("data_old/shop_db").is_dir());
    assert!(root.path().join("data/shop_db").is_dir());
    assert_eq!(
        app.log.last().map(|e| e.message.as_str()),
        Some("Repair completed successfully!")
    );
}

#[test]
fn failed_status_check_warns_and_proceeds() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir_all(root.path().join("backup/mysql")).unwrap();

    let table = std::rc::Rc::new(FakeTable::failing("tasklist not found"));
    let ports = FakePorts {
        table: table.clone(),
        listener_pid: 1,
    };
    let ctx = RuntimeContext {
        processes: table.as_ref(),
        ports: &ports,
        clock: &FixedClock,
    };
    let mut app = app_for(root.path());

    app::trigger_repair(&mut app, &ctx);

    let first = &app.log[0];
    assert_eq!(first.level, LogLevel::Warning);
    assert!(first.message.starts_with("Error checking MySQL status:"));
    assert!(root.path().join("data/mysql").is_dir());
}

#[test]
fn missing_backup_is_reported_in_log() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir_all(root.path().join("data/shop_db")).unwrap();

    let table = std::rc::Rc::new(FakeTable::running(&[]));
    let ports = FakePorts {
        table: table.clone(),
        listener_pid: 1,
    };
    let ctx = RuntimeContext {
        processes: table.as_ref(),
        ports: &ports,
        clock: &FixedClock,
    };
    let mut app = app_for(root.path());

    app::trigger_repair(&mut app, &ctx);

    assert_eq!(app.overlay, Overlay::None);
    let last = app.log.last().unwrap();
    assert_eq!(last.level, LogLevel::Error);
    assert_eq!(last.message, "'backup' directory not found.");
    assert!(app.toast.is_some());
}

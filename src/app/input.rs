//! Key handling for the mechanic TUI

use crate::app::RuntimeContext;
use crate::ui::{App, InputMode, Overlay};
use anyhow::Result;
use crossterm::event::KeyEvent;

mod normal;
mod overlay;

use normal::{handle_normal_mode, handle_path_input};
use overlay::handle_overlay_input;

/// Main key event handler - dispatches to mode-specific handlers
pub fn handle_key_event(app: &mut App, key: KeyEvent, ctx: &RuntimeContext) -> Result<()> {
    if app.overlay != Overlay::None {
        return handle_overlay_input(app, key, ctx);
    }

    match app.input_mode {
        InputMode::EditingPath => handle_path_input(app, key),
        InputMode::Normal => handle_normal_mode(app, key, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::RepairError;
    use crate::guard::ProcessTable;
    use crate::repair::SystemClock;
    use crate::system::{Connection, PortInspector};
    use crossterm::event::{KeyCode, KeyModifiers};

    struct Idle;

    impl ProcessTable for Idle {
        fn running_processes(&self) -> Result<Vec<String>, RepairError> {
            Ok(vec!["mysqld.exe".to_string()])
        }
    }

    impl PortInspector for Idle {
        fn connections(&self, _port: u16) -> Result<Vec<Connection>, RepairError> {
            Ok(Vec::new())
        }
        fn terminate(&self, _pid: u32) -> Result<(), RepairError> {
            Ok(())
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        let ctx = RuntimeContext {
            processes: &Idle,
            ports: &Idle,
            clock: &SystemClock,
        };
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE), &ctx).unwrap();
    }

    #[test]
    fn test_typing_custom_path() {
        let mut app = App::new(Config::default());
        press(&mut app, KeyCode::Char('c'));
        for c in "D:/lamp/mysql".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.path_input, "D:/lamp/mysql");
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_port_lookup_flow_from_running_server() {
        let mut app = App::new(Config::default());
        press(&mut app, KeyCode::Char('r'));
        assert!(matches!(app.overlay, Overlay::ServerRunning { .. }));

        press(&mut app, KeyCode::Char('y'));
        press(&mut app, KeyCode::Enter);
        match &app.overlay {
            Overlay::PortInspector(state) => {
                assert_eq!(state.output, "No active connections found on port 3306")
            }
            other => panic!("unexpected overlay {:?}", other),
        }

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.overlay, Overlay::None);
    }
}

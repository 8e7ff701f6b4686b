//! TUI runtime for xampp-mechanic
//!
//! Everything runs on one thread. A repair blocks the loop until it
//! returns; no redraw happens in between.

use crate::app::{input, RuntimeContext};
use crate::config::Config;
use crate::repair::SystemClock;
use crate::system::{SystemPorts, SystemProcesses};
use crate::ui::{self, App};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::Path;
use std::time::Duration;

/// Run the interactive repair console. `root_override` preselects a
/// custom root for this run only.
pub fn run_tui(config: Config, root_override: Option<&Path>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    app.config_path = Config::config_path();
    if let Some(root) = root_override {
        app.use_root_override(root);
    }

    let processes = SystemProcesses;
    let ports = SystemPorts;
    let clock = SystemClock;
    let ctx = RuntimeContext {
        processes: &processes,
        ports: &ports,
        clock: &clock,
    };

    let result = run_loop(&mut terminal, &mut app, &ctx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    ctx: &RuntimeContext,
) -> Result<()> {
    loop {
        app.clear_expired_toast();

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                input::handle_key_event(app, key, ctx)?;
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

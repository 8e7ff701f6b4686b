use crate::app::{self, RuntimeContext};
use crate::guard::OperatorChoice;
use crate::ui::{App, InspectorField, Overlay};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

/// Handle key events when an overlay is active
pub(super) fn handle_overlay_input(
    app: &mut App,
    key: KeyEvent,
    ctx: &RuntimeContext,
) -> Result<()> {
    match &app.overlay {
        Overlay::None => {}
        Overlay::Help { .. } => match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => app.close_overlay(),
            KeyCode::Down | KeyCode::Char('j') => app.overlay_scroll_down(),
            KeyCode::Up | KeyCode::Char('k') => app.overlay_scroll_up(),
            _ => {}
        },
        Overlay::Alert { .. } => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                app.close_overlay();
            }
        }
        Overlay::ServerRunning { .. } => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app::answer_server_prompt(app, OperatorChoice::InspectPorts)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app::answer_server_prompt(app, OperatorChoice::Decline)
            }
            _ => {}
        },
        Overlay::PortInspector(state) => {
            let field = state.field;
            handle_port_inspector(app, key, field, ctx);
        }
    }
    Ok(())
}

fn handle_port_inspector(
    app: &mut App,
    key: KeyEvent,
    field: InspectorField,
    ctx: &RuntimeContext,
) {
    match key.code {
        KeyCode::Esc => app.close_overlay(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            if let Some(state) = app.port_inspector_mut() {
                state.field = state.field.toggle();
            }
        }
        KeyCode::Enter => match field {
            InspectorField::Port => app::find_connections(app, ctx),
            InspectorField::Pid => app::kill_process(app, ctx),
        },
        KeyCode::Char('k') => app::kill_process(app, ctx),
        KeyCode::Backspace => {
            if let Some(state) = app.port_inspector_mut() {
                state.backspace();
            }
        }
        KeyCode::Char(c) => {
            if let Some(state) = app.port_inspector_mut() {
                state.push_char(c);
            }
        }
        _ => {}
    }
}

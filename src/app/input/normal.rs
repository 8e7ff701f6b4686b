use crate::app::{self, RuntimeContext};
use crate::ui::App;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const PAGE: usize = 10;

pub(super) fn handle_normal_mode(
    app: &mut App,
    key: KeyEvent,
    ctx: &RuntimeContext,
) -> Result<()> {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true
        }
        KeyCode::Char('?') => app.show_help(),
        KeyCode::Char('d') => app.select_default_path(),
        KeyCode::Char('c') => app.select_custom_path(),
        KeyCode::Char('e') => app.start_editing_path(),
        KeyCode::Char('r') | KeyCode::Enter => app::trigger_repair(app, ctx),
        KeyCode::Char('p') => app.open_port_inspector(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_log_up(1),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_log_down(1),
        KeyCode::PageUp => app.scroll_log_up(PAGE),
        KeyCode::PageDown => app.scroll_log_down(PAGE),
        KeyCode::Home => app.scroll_log_to_start(),
        KeyCode::End => app.scroll_log_to_end(),
        _ => {}
    }
    Ok(())
}

/// Typing into the custom path entry
pub(super) fn handle_path_input(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Tab => app.finish_editing_path(),
        KeyCode::Backspace => app.path_backspace(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true
        }
        KeyCode::Char(c) => app.path_push_char(c),
        _ => {}
    }
    Ok(())
}

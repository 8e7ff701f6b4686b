mod footer;
mod header;
mod main;
mod overlays;
mod toast;

use crate::ui::theme::Theme;
use crate::ui::{App, Overlay};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Frame,
};

use footer::render_footer;
use header::render_header;
use main::render_main;
use overlays::{render_alert, render_help, render_port_inspector, render_server_running};
use toast::render_toast;

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    frame.render_widget(Block::default().style(Style::default().bg(Theme::BG)), area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header (logo)
            Constraint::Min(10),   // Path panel + log
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(frame, layout[0], app);
    render_main(frame, layout[1], app);
    render_footer(frame, layout[2], app);

    render_overlay(frame, &app.overlay);

    if let Some(toast) = &app.toast {
        render_toast(frame, toast);
    }
}

fn render_overlay(frame: &mut Frame, overlay: &Overlay) {
    match overlay {
        Overlay::None => {}
        Overlay::Help { scroll } => render_help(frame, *scroll),
        Overlay::ServerRunning { matches } => render_server_running(frame, matches),
        Overlay::PortInspector(state) => render_port_inspector(frame, state),
        Overlay::Alert {
            title,
            message,
            kind,
            previous,
        } => {
            // Keep the covered dialog visible underneath
            if let Some(previous) = previous {
                render_overlay(frame, previous);
            }
            render_alert(frame, title, message, *kind);
        }
    }
}

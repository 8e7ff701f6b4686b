use crate::layout;
use crate::repair::{LogEntry, LogLevel, PathChoice};
use crate::ui::helpers::wrap_text;
use crate::ui::theme::Theme;
use crate::ui::{App, InputMode};
use crate::util::truncate_left;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub(super) fn render_main(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Path selection
            Constraint::Min(4),    // Log pane
        ])
        .split(area);

    render_path_panel(frame, chunks[0], app);
    render_log_pane(frame, chunks[1], app);
}

fn radio_row(label: String, on: bool) -> Line<'static> {
    let (glyph, style) = if on {
        (Theme::RADIO_ON, Theme::selected())
    } else {
        (Theme::RADIO_OFF, Theme::text_muted())
    };
    Line::from(vec![
        Span::styled(format!("  {} ", glyph), style),
        Span::styled(label, style),
    ])
}

fn render_path_panel(frame: &mut Frame, area: Rect, app: &App) {
    let editing = app.input_mode == InputMode::EditingPath;
    let inner_width = area.width.saturating_sub(10) as usize;

    let mut entry = vec![Span::styled("      ", Style::default())];
    if app.path_input.is_empty() && !editing {
        entry.push(Span::styled("press e to type a path", Theme::text_dim()));
    } else {
        let style = if app.path_choice == PathChoice::Default {
            Theme::text_muted()
        } else {
            Theme::text()
        };
        entry.push(Span::styled(truncate_left(&app.path_input, inner_width), style));
    }
    if editing {
        entry.push(Span::styled(
            Theme::CURSOR.to_string(),
            Style::default().fg(Theme::ACCENT),
        ));
    }

    let lines = vec![
        radio_row(
            format!("Use default path ({})", layout::DEFAULT_ROOT),
            app.path_choice == PathChoice::Default,
        ),
        radio_row(
            "Use custom path".to_string(),
            app.path_choice == PathChoice::Custom,
        ),
        Line::from(""),
        Line::from(entry),
    ];

    let block = Block::default()
        .title(" MySQL directory ")
        .title_style(Style::default().fg(Theme::GREY_100))
        .borders(Borders::ALL)
        .border_style(if editing {
            Theme::border_active()
        } else {
            Theme::border()
        });

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn level_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Info => Theme::text_muted(),
        LogLevel::Step => Theme::text(),
        LogLevel::Success => Style::default().fg(Theme::GREEN),
        LogLevel::Warning => Style::default().fg(Theme::YELLOW),
        LogLevel::Error => Style::default().fg(Theme::RED).add_modifier(Modifier::BOLD),
    }
}

/// One entry, wrapped so long paths and stamps stay readable
fn log_lines(entry: &LogEntry, width: usize) -> Vec<Line<'static>> {
    let style = level_style(entry.level);
    wrap_text(&entry.message, width)
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let lead = if i == 0 {
                format!("  {} ", entry.level.icon())
            } else {
                "    ".to_string()
            };
            Line::from(vec![Span::styled(lead, style), Span::styled(text, style)])
        })
        .collect()
}

/// Wrapped rows for the entries in view, clipped to the newest `height`
fn visible_lines(
    entries: &[LogEntry],
    bottom: usize,
    width: usize,
    height: usize,
) -> Vec<Line<'static>> {
    let (start, end) = visible_range(entries.len(), bottom, height);
    let mut lines: Vec<Line> = entries[start..end]
        .iter()
        .flat_map(|entry| log_lines(entry, width))
        .collect();
    let overflow = lines.len().saturating_sub(height);
    lines.drain(..overflow);
    lines
}

/// Indices of the log entries that fit, ending at `app.log_scroll`
fn visible_range(len: usize, bottom: usize, height: usize) -> (usize, usize) {
    if len == 0 || height == 0 {
        return (0, 0);
    }
    let end = (bottom + 1).min(len);
    (end.saturating_sub(height), end)
}

fn render_log_pane(frame: &mut Frame, area: Rect, app: &App) {
    let height = area.height.saturating_sub(2) as usize;
    let width = area.width.saturating_sub(8) as usize;

    let lines: Vec<Line> = if app.log.is_empty() {
        vec![Line::from(Span::styled(
            "  Nothing yet. Press r to repair the selected directory.",
            Theme::text_dim(),
        ))]
    } else {
        visible_lines(&app.log, app.log_scroll, width, height)
    };

    let title = if app.follow_log || app.log.is_empty() {
        " Log ".to_string()
    } else {
        format!(" Log ({}/{}) ", app.log_scroll + 1, app.log.len())
    };

    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(Theme::GREY_100))
        .borders(Borders::ALL)
        .border_style(Theme::border());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

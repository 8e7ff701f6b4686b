use crate::config::Config;
use crate::ui::helpers::{centered_rect, wrap_text};
use crate::ui::theme::Theme;
use crate::ui::{AlertKind, InspectorField, PortInspectorState};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

fn key_hint(key: &str, label: &str) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!(" {} ", key), Theme::key()),
        Span::styled(format!(" {}  ", label), Style::default().fg(Theme::GREY_400)),
    ]
}

fn dialog_block(title: &str, accent: ratatui::style::Color) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title))
        .title_style(Style::default().fg(Theme::GREY_100))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .style(Style::default().bg(Theme::GREY_800))
}

pub(super) fn render_help(frame: &mut Frame, scroll: usize) {
    let area = centered_rect(60, 80, frame.area());
    frame.render_widget(Clear, area);

    fn section(title: &str) -> Vec<Line<'static>> {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("    {}", title),
                Style::default()
                    .fg(Theme::WHITE)
                    .add_modifier(Modifier::BOLD),
            )),
        ]
    }

    fn key_row(key: &str, desc: &str) -> Line<'static> {
        Line::from(vec![
            Span::styled("    ".to_string(), Style::default()),
            Span::styled(
                format!(" {:<7} ", key),
                Style::default().fg(Theme::GREY_900).bg(Theme::GREY_300),
            ),
            Span::styled(format!("  {}", desc), Style::default().fg(Theme::GREY_200)),
        ])
    }

    let mut lines: Vec<Line<'static>> = Vec::new();

    lines.extend(section("Directory"));
    lines.push(key_row("d", "Use the default XAMPP path"));
    lines.push(key_row("c", "Use a custom path"));
    lines.push(key_row("e", "Edit the custom path"));

    lines.extend(section("Repair"));
    lines.push(key_row("r", "Swap 'data' for 'backup' and merge schemas back"));
    lines.push(key_row("p", "Check which process holds a port"));

    lines.extend(section("Log"));
    lines.push(key_row("↑↓", "Scroll"));
    lines.push(key_row("PgUp/Dn", "Page scroll"));
    lines.push(key_row("Home/End", "Jump to first / latest line"));

    lines.extend(section("General"));
    lines.push(key_row("?", "Show help"));
    lines.push(key_row("Esc", "Close dialog"));
    lines.push(key_row("q", "Quit"));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("    config: {}", Config::config_location()),
        Theme::text_dim(),
    )));

    let max_scroll = lines.len().saturating_sub(1);
    let paragraph = Paragraph::new(lines)
        .block(dialog_block("Help", Theme::GREY_400))
        .scroll((scroll.min(max_scroll) as u16, 0));

    frame.render_widget(paragraph, area);
}

pub(super) fn render_server_running(frame: &mut Frame, matches: &[String]) {
    let area = centered_rect(55, 45, frame.area());
    frame.render_widget(Clear, area);
    let width = area.width.saturating_sub(6) as usize;

    let mut lines = vec![Line::from("")];
    for text in wrap_text(
        "MySQL appears to be running. Do you want to proceed and stop the process manually?",
        width,
    ) {
        lines.push(Line::from(Span::styled(format!("  {}", text), Theme::text())));
    }

    lines.push(Line::from(""));
    for name in matches {
        lines.push(Line::from(vec![
            Span::styled("    • ", Style::default().fg(Theme::YELLOW)),
            Span::styled(name.clone(), Theme::text_muted()),
        ]));
    }

    lines.push(Line::from(""));
    let mut hints = vec![Span::styled("  ", Style::default())];
    hints.extend(key_hint("y", "check port"));
    hints.extend(key_hint("n", "cancel"));
    lines.push(Line::from(hints));

    frame.render_widget(
        Paragraph::new(lines).block(dialog_block("MySQL is Running", Theme::YELLOW)),
        area,
    );
}

fn input_row(label: &str, value: &str, focused: bool) -> Line<'static> {
    let (label_style, value_style) = if focused {
        (Theme::selected(), Style::default().fg(Theme::WHITE).bg(Theme::GREY_700))
    } else {
        (Theme::text_muted(), Theme::text())
    };
    let mut spans = vec![
        Span::styled(format!("  {:<6}", label), label_style),
        Span::styled(format!(" {} ", value), value_style),
    ];
    if focused {
        spans.push(Span::styled(
            Theme::CURSOR.to_string(),
            Style::default().fg(Theme::ACCENT),
        ));
    }
    Line::from(spans)
}

pub(super) fn render_port_inspector(frame: &mut Frame, state: &PortInspectorState) {
    let area = centered_rect(70, 70, frame.area());
    frame.render_widget(Clear, area);
    let width = area.width.saturating_sub(6) as usize;

    let mut lines = vec![
        Line::from(""),
        input_row("Port", &state.port_input, state.field == InspectorField::Port),
        Line::from(""),
    ];

    if state.output.is_empty() {
        lines.push(Line::from(Span::styled(
            "  Press ↵ to list the connections on this port.",
            Theme::text_dim(),
        )));
    } else {
        for raw in state.output.lines() {
            for text in wrap_text(raw, width) {
                lines.push(Line::from(Span::styled(format!("  {}", text), Theme::text())));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(input_row("PID", &state.pid_input, state.field == InspectorField::Pid));
    lines.push(Line::from(""));

    let mut hints = vec![Span::styled("  ", Style::default())];
    hints.extend(key_hint("Tab", "switch field"));
    match state.field {
        InspectorField::Port => hints.extend(key_hint("↵", "find")),
        InspectorField::Pid => hints.extend(key_hint("↵", "kill")),
    }
    hints.extend(key_hint("Esc", "close"));
    lines.push(Line::from(hints));

    frame.render_widget(
        Paragraph::new(lines).block(dialog_block("Check Port Usage", Theme::ACCENT)),
        area,
    );
}

pub(super) fn render_alert(frame: &mut Frame, title: &str, message: &str, kind: AlertKind) {
    let area = centered_rect(45, 30, frame.area());
    frame.render_widget(Clear, area);
    let width = area.width.saturating_sub(6) as usize;

    let accent = match kind {
        AlertKind::Info => Theme::GREY_300,
        AlertKind::Success => Theme::GREEN,
        AlertKind::Error => Theme::RED,
    };

    let mut lines = vec![Line::from("")];
    for text in wrap_text(message, width) {
        lines.push(Line::from(Span::styled(format!("  {}", text), Theme::text())));
    }
    lines.push(Line::from(""));
    let mut hints = vec![Span::styled("  ", Style::default())];
    hints.extend(key_hint("↵", "ok"));
    lines.push(Line::from(hints));

    frame.render_widget(Paragraph::new(lines).block(dialog_block(title, accent)), area);
}

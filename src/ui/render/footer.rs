use crate::ui::theme::Theme;
use crate::ui::{App, InputMode};
use crate::util::truncate_left;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Key hints for the current input mode, as (key, label) pairs
fn hints(app: &App) -> &'static [(&'static str, &'static str)] {
    match app.input_mode {
        InputMode::EditingPath => &[(" ↵ ", "done"), (" Esc ", "done")],
        InputMode::Normal => &[
            (" d ", "default"),
            (" c ", "custom"),
            (" e ", "edit"),
            (" r ", "repair"),
            (" p ", "ports"),
            (" ? ", "help"),
            (" q ", "quit"),
        ],
    }
}

pub(super) fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let hints = hints(app);
    let buttons_width: usize = hints
        .iter()
        .map(|(key, label)| key.chars().count() + label.chars().count() + 3)
        .sum();

    let available = area.width as usize;
    let path_budget = available.saturating_sub(buttons_width + 4).min(48);
    let target = truncate_left(&app.repair_options().root.display().to_string(), path_budget);

    let mut spans = vec![
        Span::styled("  ", Style::default()),
        Span::styled(target, Style::default().fg(Theme::GREY_400)),
    ];

    let status_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let spacer_len = available.saturating_sub(status_len + buttons_width);
    if spacer_len > 0 {
        spans.push(Span::styled(" ".repeat(spacer_len), Style::default()));
    }

    for (key, label) in hints {
        spans.push(Span::styled(*key, Theme::key()));
        spans.push(Span::styled(
            format!(" {}  ", label),
            Style::default().fg(Theme::GREY_400),
        ));
    }

    let footer = Paragraph::new(vec![Line::from(""), Line::from(spans)])
        .style(Style::default().bg(Theme::GREY_800));
    frame.render_widget(footer, area);
}

use crate::ui::theme::Theme;
use crate::ui::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub(super) fn render_header(frame: &mut Frame, area: Rect, _app: &App) {
    let spans = vec![
        Span::styled(
            format!("   {}", Theme::LOGO),
            Style::default()
                .fg(Theme::WHITE)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("   {}", Theme::TAGLINE), Theme::text_dim()),
    ];

    let lines = vec![Line::from(""), Line::from(spans)];

    let header = Paragraph::new(lines).style(Style::default().bg(Theme::BG));
    frame.render_widget(header, area);
}

// src/ui/widgets/footer.rs

use crate::app::{App, AppState};
use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Renders the footer widget, which displays available actions.
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::new().bold().fg(Color::Yellow));
    let logs = if app.show_logs { " to hide logs, " } else { " to show logs, " };

    let spans = match app.state {
        AppState::Disclaimer => Line::from(vec![
            key("Enter"), Span::raw(" to continue, "),
            key("Esc"), Span::raw(" to quit."),
        ]),
        AppState::Idle => Line::from(vec![
            key("Enter"), Span::raw(" to run, "),
            key("Tab"), Span::raw(logs),
            key("Esc"), Span::raw(" to quit."),
        ]),
        AppState::Finished => Line::from(vec![
            key("[N]"), Span::raw("ew command, "),
            key("↑ ↓"), Span::raw(" scroll, "),
            key("Tab"), Span::raw(logs),
            key("[Q]"), Span::raw("uit"),
        ]),
        AppState::Running => Line::from(vec![
            Span::raw("Working... "),
            key("Tab"), Span::raw(logs),
            key("Q"), Span::raw(" to quit."),
        ]),
    };

    let footer = Paragraph::new(spans).alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

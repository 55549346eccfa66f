// src/ui/widgets/input.rs
use ratatui::{prelude::*, widgets::{Block, Borders, Paragraph}};
use crate::app::{App, AppState};

/// Renders the command line.
pub fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let title = match (&app.state, &app.last_command) {
        (AppState::Idle, _) | (_, None) => "Command (url | ip | file | xpand | waf)".to_string(),
        (_, Some(last)) => format!("Last command: {}", last),
    };
    let input_block = Block::default().borders(Borders::ALL).title(title);
    let input_paragraph = Paragraph::new(app.input.as_str())
        .block(input_block)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(input_paragraph, area);

    // Show the cursor only while typing.
    if let AppState::Idle = app.state {
        frame.set_cursor_position((
            area.x + app.input.chars().count() as u16 + 1,
            area.y + 1,
        ));
    }
}

// src/ui/widgets/log_view.rs

use crate::app::App;
use ratatui::{
    prelude::*,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation},
};

/// Renders the newest log lines with a horizontal scrollbar for long entries.
pub fn render_log_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title("Logs (scroll with ← →)")
        .borders(Borders::ALL);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let max_width = app.log_content.iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    app.log_horizontal_scroll_state = app.log_horizontal_scroll_state.content_length(max_width);

    // Only the tail that fits is shown; the file is already oldest-first.
    let visible = inner_area.height.saturating_sub(1) as usize;
    let skip = app.log_content.len().saturating_sub(visible);
    let log_lines: Vec<Line> = app.log_content.iter().skip(skip).map(|line| style_log_line(line)).collect();

    let log_paragraph = Paragraph::new(log_lines)
        .scroll((0, app.log_horizontal_scroll as u16));
    frame.render_widget(log_paragraph, inner_area);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::HorizontalBottom)
        .thumb_symbol("■");
    let scrollbar_area = Rect {
        x: inner_area.x,
        y: inner_area.y + inner_area.height.saturating_sub(1),
        width: inner_area.width,
        height: 1,
    };
    frame.render_stateful_widget(
        scrollbar,
        scrollbar_area,
        &mut app.log_horizontal_scroll_state,
    );
}

/// Greys out the timestamp and colors the level of a `TIMESTAMP LEVEL message` line.
fn style_log_line(line: &str) -> Line<'_> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(timestamp), Some(level)) => {
            let after_timestamp = line
                .find(timestamp)
                .map(|at| &line[at + timestamp.len()..])
                .unwrap_or("");
            let rest = after_timestamp
                .find(level)
                .map(|at| &after_timestamp[at + level.len()..])
                .unwrap_or("");
            let level_style = match level {
                "ERROR" => Style::default().fg(Color::Red),
                "WARN" => Style::default().fg(Color::Yellow),
                "INFO" => Style::default().fg(Color::Green),
                _ => Style::default().fg(Color::Blue),
            };
            Line::from(vec![
                Span::styled(timestamp, Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::styled(level, level_style),
                Span::raw(rest),
            ])
        }
        _ => Line::from(line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_timestamp_and_level() {
        let line = style_log_line("2026-01-01T10:00:00Z  WARN Rate limited.");
        let spans: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(spans[0], "2026-01-01T10:00:00Z");
        assert_eq!(spans[2], "WARN");
        assert_eq!(spans[3], " Rate limited.");
    }

    #[test]
    fn unstructured_lines_pass_through() {
        let line = style_log_line("plain");
        assert_eq!(line.spans.len(), 1);
    }
}

// src/ui/widgets/summary.rs

use crate::app::{App, AppState};
use crate::commands::CommandResult;
use crate::core::knowledge_base;
use crate::core::models::{ReputationStats, RiskLevel};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph},
};

/// Renders the summary panel: verdict, detection gauge and engine totals.
///
/// Only reputation reports fill the gauge; other results show just the verdict line.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let summary_container = Block::default().borders(Borders::ALL).title("Summary");
    frame.render_widget(summary_container, area);

    let summary_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Verdict
            Constraint::Length(1), // Gauge
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Totals
        ])
        .split(area);

    if app.state != AppState::Finished {
        return;
    }
    let Some(CommandResult::Reputation { outcome, .. }) = &app.result else {
        return;
    };

    let kind = knowledge_base::verdict_kind(outcome);
    let Some(stats) = outcome.stats() else {
        let verdict = Text::from(vec![Line::from("Verdict".bold()), Line::from(kind.to_string()).yellow()]);
        frame.render_widget(Paragraph::new(verdict).alignment(Alignment::Center), summary_chunks[0]);
        return;
    };

    let color = risk_color(stats);
    let verdict = Text::from(vec![
        Line::from("Verdict".bold()),
        Line::from(kind.to_string()).style(Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(verdict).alignment(Alignment::Center), summary_chunks[0]);

    let ratio = stats.detection_ratio();
    let gauge = Gauge::default()
        .percent(ratio.min(100))
        .label(format!("{}% flagged", ratio))
        .style(Style::default().fg(color));
    frame.render_widget(gauge, summary_chunks[1]);

    let totals = Text::from(vec![
        Line::from("ENGINES".bold()),
        Line::from(format!("{} engines voted", stats.total())),
        Line::from(format!("{} flagged", stats.flagged())),
    ]);
    frame.render_widget(Paragraph::new(totals), summary_chunks[3]);
}

fn risk_color(stats: &ReputationStats) -> Color {
    match stats.risk() {
        RiskLevel::Alert => Color::Red,
        RiskLevel::Safe if stats.suspicious > 0 => Color::Yellow,
        RiskLevel::Safe => Color::Green,
    }
}

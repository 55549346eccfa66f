// src/ui/widgets/results.rs

use crate::app::{App, AppState, SPINNER_CHARS};
use crate::commands::{CommandKind, CommandResult};
use crate::core::knowledge_base::{self, ResourceKind};
use crate::core::models::{ReputationStats, ScanOutcome, WafResults, WafVerdict};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, Wrap},
};

/// Renders the main content area based on the application state.
pub fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let results_block = Block::default().borders(Borders::ALL).title("Results");

    match app.state {
        AppState::Disclaimer | AppState::Idle => {
            let instructions = Paragraph::new(Text::from(vec![
                Line::from("Commands".bold()),
                Line::from("  url <address>     reputation of a URL"),
                Line::from("  ip <address>      reputation of a public IP address"),
                Line::from("  file <path>       upload a file and fetch its report"),
                Line::from("  xpand <short-url> follow redirects to the final URL"),
                Line::from("  waf <url>         fingerprint a web application firewall"),
                Line::from(""),
                Line::from("Press Enter to run. Tab shows the logs, Esc quits."),
            ]))
            .block(results_block)
            .wrap(Wrap { trim: false });
            frame.render_widget(instructions, area);
        }
        AppState::Running => {
            let spinner = SPINNER_CHARS[app.spinner_frame % SPINNER_CHARS.len()];
            let running = Paragraph::new(format!("{} Working... Please wait.", spinner))
                .block(results_block)
                .style(Style::default().fg(Color::Cyan));
            frame.render_widget(running, area);
        }
        AppState::Finished => {
            let Some(result) = &app.result else { return };
            let mut lines = build_result_lines(result);
            if let Some(at) = app.finished_at {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!("Completed at {}", at.format("%Y-%m-%d %H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            let line_count = lines.len();

            let paragraph = Paragraph::new(lines)
                .block(results_block)
                .wrap(Wrap { trim: false })
                .scroll((app.scroll_offset as u16, 0));
            frame.render_widget(paragraph, area);

            let mut scroll_state = app
                .report_scroll_state
                .content_length(line_count)
                .position(app.scroll_offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                area.inner(Margin { vertical: 1, horizontal: 0 }),
                &mut scroll_state,
            );
        }
    }
}

fn build_result_lines(result: &CommandResult) -> Vec<Line<'static>> {
    match result {
        CommandResult::Reputation { kind, subject, outcome } => reputation_lines(*kind, subject, outcome),
        CommandResult::Expanded { short_url, result } => {
            let mut lines = vec![
                heading("URL Expansion"),
                Line::from(format!("Short URL: {}", short_url)),
            ];
            match result {
                Ok(final_url) => lines.push(Line::from(vec![
                    Span::raw("Final URL: "),
                    Span::styled(final_url.clone(), Style::default().fg(Color::Green)),
                ])),
                Err(e) => lines.push(error_line(e)),
            }
            lines
        }
        CommandResult::Waf(results) => waf_lines(results),
        CommandResult::Failed(message) => vec![heading("Command failed"), error_line(message)],
    }
}

fn reputation_lines(kind: CommandKind, subject: &str, outcome: &ScanOutcome) -> Vec<Line<'static>> {
    let mut lines = vec![
        heading("Reputation Report"),
        Line::from(format!("Target: {}", subject)),
        Line::from(""),
    ];

    if let Some(detail) = knowledge_base::verdict_for(outcome) {
        let style = verdict_style(outcome);
        lines.push(Line::from(Span::styled(detail.title, style.bold())));
        lines.push(Line::from(detail.description));
        lines.push(Line::from(Span::styled(detail.advice, Style::default().italic())));
        lines.push(Line::from(""));
    }

    match outcome {
        ScanOutcome::Report { stats, resource_id } => {
            lines.extend(counter_lines(stats));
            let link = match kind {
                CommandKind::Url => Some(knowledge_base::permalink(ResourceKind::Url, subject)),
                CommandKind::Ip => Some(knowledge_base::permalink(ResourceKind::IpAddress, subject)),
                CommandKind::File => resource_id
                    .as_deref()
                    .map(|id| knowledge_base::permalink(ResourceKind::File, id)),
                CommandKind::Xpand | CommandKind::Waf => None,
            };
            if let Some(link) = link {
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::raw("Full report: "),
                    Span::styled(link, Style::default().fg(Color::Blue).underlined()),
                ]));
            }
        }
        ScanOutcome::Ineligible(reason) => lines.push(error_line(&reason.to_string())),
        ScanOutcome::NoReport(detail) => lines.push(Line::from(Span::styled(
            detail.clone(),
            Style::default().fg(Color::Yellow),
        ))),
        ScanOutcome::TransientError(message) => lines.push(error_line(message)),
    }
    lines
}

fn counter_lines(stats: &ReputationStats) -> Vec<Line<'static>> {
    let counter = |label: &'static str, value: u32, color: Color| {
        let style = if value > 0 { Style::default().fg(color).bold() } else { Style::default() };
        Line::from(vec![Span::raw(format!("{:<12}", label)), Span::styled(value.to_string(), style)])
    };
    vec![
        counter("Malicious", stats.malicious, Color::Red),
        counter("Suspicious", stats.suspicious, Color::Yellow),
        counter("Harmless", stats.harmless, Color::Green),
        counter("Undetected", stats.undetected, Color::Gray),
    ]
}

fn waf_lines(results: &WafResults) -> Vec<Line<'static>> {
    let mut lines = vec![heading("WAF Detection"), Line::from(format!("Target: {}", results.target))];
    match &results.verdict {
        Ok(WafVerdict::Detected { site, primary, secondary }) => {
            lines.push(Line::from(vec![
                Span::raw(format!("{} is behind ", site)),
                Span::styled(primary.clone(), Style::default().fg(Color::Yellow).bold()),
            ]));
            if let Some(secondary) = secondary {
                lines.push(Line::from(format!("  also matched: {}", secondary)));
            }
        }
        Ok(WafVerdict::NotDetected) => lines.push(Line::from(Span::styled(
            "No WAF detected.",
            Style::default().fg(Color::Green),
        ))),
        Ok(WafVerdict::Unreachable) => lines.push(error_line("Site appears to be down or unreachable.")),
        Err(e) => lines.push(error_line(e)),
    }
    if let Some(requests) = results.requests {
        lines.push(Line::from(Span::styled(
            format!("Requests sent: {}", requests),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

fn verdict_style(outcome: &ScanOutcome) -> Style {
    match knowledge_base::verdict_kind(outcome) {
        knowledge_base::VerdictKind::Alert | knowledge_base::VerdictKind::ServiceError => Style::default().fg(Color::Red),
        knowledge_base::VerdictKind::Safe => Style::default().fg(Color::Green),
        _ => Style::default().fg(Color::Yellow),
    }
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().bold().underlined()))
}

fn error_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red)))
}

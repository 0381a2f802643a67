// src/ui/widgets/summary.rs

use crate::app::App;
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph, Sparkline},
};

/// Renders the dashboard summary: risk score, device counts, new-device
/// alerts, scan activity and the most recent scans.
///
/// Every figure comes from the latest network scan except the history, which
/// covers all scan kinds.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let summary_container = Block::default().borders(Borders::ALL).title("Summary");
    frame.render_widget(summary_container, area);

    let summary = &app.summary;
    let alert_rows = summary.alerts.len().clamp(1, 5) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),              // Score & rating
            Constraint::Length(1),              // Gauge
            Constraint::Length(1),              // Spacer
            Constraint::Length(5),              // Devices
            Constraint::Length(alert_rows + 1), // Alerts
            Constraint::Length(4),              // Activity
            Constraint::Min(0),                 // Recent scans
        ])
        .split(area);

    // --- Risk Score ---
    let (rating_text, rating_color) = match summary.risk_score {
        0..=20 => ("Low", Color::Green),
        21..=50 => ("Moderate", Color::Yellow),
        _ => ("High", Color::Red),
    };
    let score_text = Text::from(vec![
        Line::from("Risk Score".bold()),
        Line::from(format!("{}/100 ({})", summary.risk_score, rating_text)).style(Style::default().fg(rating_color)),
    ]);
    frame.render_widget(Paragraph::new(score_text).alignment(Alignment::Center), chunks[0]);

    let gauge = Gauge::default()
        .percent(u16::from(summary.risk_score.min(100)))
        .label("")
        .gauge_style(Style::default().fg(rating_color));
    frame.render_widget(gauge, chunks[1]);

    // --- Devices ---
    let device_lines: Vec<Line> = summary
        .device_stats
        .iter()
        .map(|(device, count)| {
            Line::from(vec![
                Span::raw(format!("{device:<9}")),
                Span::styled(count.to_string(), Style::default().fg(Color::Cyan)),
            ])
        })
        .collect();
    let devices_title = format!("DEVICES ({} hosts)", summary.hosts.len());
    frame.render_widget(
        Paragraph::new(device_lines).block(Block::default().title(Span::styled(devices_title, Style::new().bold()))),
        chunks[3],
    );

    // --- Alerts ---
    let alert_lines: Vec<Line> = if summary.alerts.is_empty() {
        vec![Line::styled("No new devices.", Style::default().fg(Color::Green))]
    } else {
        summary
            .alerts
            .iter()
            .map(|alert| Line::styled(alert.message.clone(), Style::default().fg(Color::Red)))
            .collect()
    };
    frame.render_widget(
        Paragraph::new(alert_lines).block(Block::default().title("ALERTS".bold())),
        chunks[4],
    );

    // --- Activity ---
    let activity: Vec<u64> = summary.activity.iter().map(|(_, count)| *count as u64).collect();
    let sparkline = Sparkline::default()
        .block(Block::default().title("ACTIVITY".bold()))
        .data(&activity)
        .style(Style::default().fg(Color::Cyan));
    frame.render_widget(sparkline, chunks[5]);

    // --- Recent Scans ---
    let history_lines: Vec<Line> = summary
        .history
        .iter()
        .rev()
        .map(|record| {
            Line::from(vec![
                Span::styled(
                    record.timestamp.format("%H:%M:%S ").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(record.name.clone()),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(history_lines).block(Block::default().title("RECENT SCANS".bold())),
        chunks[6],
    );
}

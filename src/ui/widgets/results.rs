// src/ui/widgets/results.rs

use crate::app::{App, AppState, SPINNER_CHARS};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, Wrap},
};
use reconwatch::core::dispatch::HELP;

/// Renders the output of the most recent scan.
///
/// While a scan runs the previous output is replaced by a spinner. A failed
/// command is shown in red in place of the findings.
pub fn render_results(frame: &mut Frame, app: &mut App, area: Rect) {
    let title = match &app.last_scan {
        Some(scan) => match &scan.target {
            Some(target) => format!("{} - {} (↑ ↓)", scan.name, target),
            None => format!("{} (↑ ↓)", scan.name),
        },
        None => "Results".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if let AppState::Scanning = app.state {
        let spinner_char = SPINNER_CHARS[app.spinner_frame];
        let content = Paragraph::new(Line::from(vec![
            Span::styled(format!("{spinner_char} "), Style::default().fg(Color::Cyan)),
            Span::raw("Scanning... Partial results are kept if you cancel."),
        ]))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(content, area);
        return;
    }

    let lines = app.result_lines();
    if lines.is_empty() {
        let instructions = Paragraph::new(HELP).block(block).wrap(Wrap { trim: true });
        frame.render_widget(instructions, area);
        return;
    }

    let style = if app.last_error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let text: Vec<Line> = lines.into_iter().map(|l| Line::styled(l, style)).collect();

    let inner_area = block.inner(area);
    frame.render_widget(block, area);
    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset as u16, 0));
    frame.render_widget(paragraph, inner_area);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
    frame.render_stateful_widget(scrollbar, inner_area, &mut app.report_scroll_state);
}

// src/ui/widgets/footer.rs

use crate::app::{App, AppState, ExportStatus};
use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

fn key(label: &str) -> Span<'_> {
    Span::styled(label, Style::new().bold().fg(Color::Yellow))
}

/// Renders the footer bar with the keys available in the current state.
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let line = match app.state {
        AppState::Idle => Line::from(vec![
            Span::raw("Type a command and press "),
            key("Enter"),
            Span::raw(", "),
            key("Tab"),
            Span::raw(" logs, "),
            key("Esc"),
            Span::raw(" to quit."),
        ]),
        AppState::Finished => {
            let mut spans = vec![
                key("[N]"),
                Span::raw("ew command, "),
                key("[E]"),
                Span::raw("xport report, "),
                key("[Tab]"),
                Span::raw(" logs, "),
                key("[Q]"),
                Span::raw("uit"),
            ];
            match &app.export_status {
                ExportStatus::Idle => {}
                ExportStatus::Success(path) => {
                    spans.push(Span::styled(format!("  Saved to {path}"), Style::new().fg(Color::Green)));
                }
                ExportStatus::Error(e) => {
                    spans.push(Span::styled(format!("  Export failed: {e}"), Style::new().fg(Color::Red)));
                }
            }
            Line::from(spans)
        }
        AppState::Scanning => Line::from(vec![
            Span::raw("Scanning... "),
            key("C"),
            Span::raw(" to cancel, "),
            key("Tab"),
            Span::raw(" logs, "),
            key("Q"),
            Span::raw(" to quit."),
        ]),
    };

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

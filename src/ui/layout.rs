// src/ui/layout.rs

use ratatui::layout::{Constraint, Layout, Rect};

/// Screen regions of the dashboard. `log_panel` is empty while logs are hidden.
pub struct AppLayout {
    pub input: Rect,
    pub report: Rect,
    pub summary: Rect,
    pub footer: Rect,
    pub log_panel: Rect,
}

/// Command box on top, footer at the bottom, and between them the results
/// next to the summary (plus the log panel when `show_logs` is set).
pub fn create_layout(frame_size: Rect, show_logs: bool) -> AppLayout {
    let [input, content, footer] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)]).areas(frame_size);

    if show_logs {
        let [report, summary, log_panel] = Layout::horizontal([
            Constraint::Percentage(45),
            Constraint::Percentage(25),
            Constraint::Percentage(30),
        ])
        .areas(content);
        AppLayout { input, report, summary, footer, log_panel }
    } else {
        let [report, summary] =
            Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).areas(content);
        AppLayout { input, report, summary, footer, log_panel: Rect::default() }
    }
}

// src/ui/widgets/disclaimer_popup.rs

use ratatui::{
    layout::Flex,
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Draws the authorization notice over the dashboard until it is acknowledged.
pub fn render_disclaimer_popup(frame: &mut Frame, area: Rect) {
    let disclaimer_text = Text::from(vec![
        Line::from("AUTHORIZED USE ONLY".bold().yellow()),
        Line::from(""),
        Line::from("ReconWatch enumerates subdomains and web paths, queries DNS and WHOIS, and inventories the hosts this machine talks to."),
        Line::from(""),
        Line::from("Only point it at networks, domains and sites you own or have written permission to assess. Brute-force enumeration against third parties may be unlawful where you are."),
        Line::from(""),
        Line::from("Findings are heuristic. Device types are guessed from hostnames and the risk score is a rough indicator, not an audit."),
        Line::from(""),
        Line::from("Press ".bold() + "Enter".bold().yellow() + " to continue or ".bold() + "Esc".bold().yellow() + " to leave".bold()),
    ]);

    let block = Block::default()
        .title("Before you start")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let popup_area = centered_rect(60, 60, area);

    let popup = Paragraph::new(disclaimer_text)
        .block(block)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

/// A `Rect` of the given percentages, centered in `r`.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(r);
    let [popup] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    popup
}

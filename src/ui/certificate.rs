//! Certificate screen

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::layout::centered_fixed;
use crate::certificate::Certificate;
use crate::theme::Theme;

pub fn draw(frame: &mut Frame, area: Rect, certificate: Option<&Certificate>, theme: &Theme) {
    let card = centered_fixed(64, 17, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(theme.warning))
        .style(Style::default().bg(theme.bg_secondary));
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let Some(cert) = certificate else {
        let text = Paragraph::new("Complete the program to earn your certificate.")
            .style(Style::default().fg(theme.fg_muted))
            .alignment(Alignment::Center);
        frame.render_widget(text, inner);
        return;
    };

    let muted = Style::default().fg(theme.fg_muted);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "HEALTHCARE ANALYSIS HQ",
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("Certificate of Completion", Style::default().fg(theme.warning))),
        Line::from(""),
        Line::from(Span::styled("This certifies that", muted)),
        Line::from(""),
        Line::from(Span::styled(
            cert.name.clone(),
            Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("completed {} days of daily healthcare data challenges", cert.days_completed),
            muted,
        )),
        Line::from(Span::styled(
            format!("{} track \u{00b7} batch {}", cert.track, cert.batch_code),
            Style::default().fg(theme.fg_secondary),
        )),
        Line::from(Span::styled(cert.completed_on.format("%B %-d, %Y").to_string(), muted)),
        Line::from(""),
        Line::from(Span::styled(
            "[y] Copy share text    [d] Download    [:reset] Start over",
            Style::default().fg(theme.info),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

//! Technology selection screen

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::layout::{centered_fixed, panel};
use crate::app::state::{AppState, TechOption};
use crate::theme::Theme;

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let card = centered_fixed(50, 14, area);
    let block = panel(" Choose your technology ", theme);
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Welcome{}!", greeting(state.display_name())),
            Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Which track do you want to practise?",
            Style::default().fg(theme.fg_muted),
        )),
        Line::from(""),
    ];

    for (i, option) in TechOption::ALL.iter().enumerate() {
        let selected = i == state.tech_cursor;
        let marker = if selected { "\u{25B6}" } else { " " };
        let (label, style) = match option {
            TechOption::Available(_) => {
                let style = if selected {
                    Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.fg_secondary)
                };
                (option.label().to_string(), style)
            }
            TechOption::ComingSoon(_) => (
                format!("{} (coming soon)", option.label()),
                Style::default().fg(theme.fg_muted).add_modifier(Modifier::ITALIC),
            ),
        };
        lines.push(Line::from(Span::styled(format!("{marker} {}. {label}", i + 1), style)));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn greeting(name: &str) -> String {
    if name.is_empty() { String::new() } else { format!(", {name}") }
}

//! Day-complete screen

use chrono::NaiveDate;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::layout::{centered_fixed, panel};
use crate::app::state::AppState;
use crate::calendar::day_number;
use crate::theme::Theme;

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState, date: NaiveDate, theme: &Theme) {
    let card = centered_fixed(56, 13, area);
    let block = panel(" Well done ", theme);
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let day = state.days.first().map(|first| day_number(first.date, date)).unwrap_or(1);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Day {day} complete!"),
            Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            date.format("%A, %B %-d").to_string(),
            Style::default().fg(theme.fg_muted),
        )),
        Line::from(""),
    ];

    if let Some(summary) = &state.summary {
        lines.push(Line::from(Span::styled(
            format!(
                "{} of {} days done \u{00b7} {:.0}% \u{00b7} streak {}",
                summary.completed_count, summary.total_days, summary.percent_complete, summary.streak
            ),
            Style::default().fg(theme.fg_primary),
        )));
        if let Some(latest) = summary.achievements.iter().rev().find(|a| a.unlocked) {
            lines.push(Line::from(Span::styled(
                format!("{} {}", latest.icon, latest.name),
                Style::default().fg(theme.warning),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[Enter] View calendar    [c] Change technology",
        Style::default().fg(theme.fg_muted),
    )));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

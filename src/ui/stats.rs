//! Progress statistics screen

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::layout::panel;
use crate::stats::ProgressSummary;
use crate::theme::Theme;

pub fn draw(frame: &mut Frame, area: Rect, summary: &ProgressSummary, theme: &Theme) {
    let [numbers, badges] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(area);

    let block = panel(" Statistics ", theme);
    let inner = block.inner(numbers);
    frame.render_widget(block, numbers);

    let stat = |label: &str, value: String, color| {
        Line::from(vec![
            Span::styled(format!(" {label:<20}"), Style::default().fg(theme.fg_muted)),
            Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ])
    };

    let lines = vec![
        Line::from(""),
        stat("Completion", format!("{:.1}%", summary.percent_complete), theme.accent_primary),
        stat("Program days", summary.total_days.to_string(), theme.fg_primary),
        stat("Completed", summary.completed_count.to_string(), theme.success),
        stat("Attempted", summary.attempted_count.to_string(), theme.fg_primary),
        stat("Incomplete", summary.incomplete_count.to_string(), theme.warning),
        stat("Missed", summary.missed_count.to_string(), theme.error),
        stat("Remaining", summary.remaining_count.to_string(), theme.fg_primary),
        stat("Success rate", format!("{:.1}%", summary.success_rate), theme.info),
        stat("Current streak", summary.streak.to_string(), theme.warning),
    ];
    frame.render_widget(Paragraph::new(lines), inner);

    let title = format!(" Achievements {}/{} ", summary.unlocked_count(), summary.achievements.len());
    let block = panel(&title, theme);
    let inner = block.inner(badges);
    frame.render_widget(block, badges);

    let mut lines = vec![Line::from("")];
    for achievement in &summary.achievements {
        let (name_style, status) = if achievement.unlocked {
            (Style::default().fg(theme.warning).add_modifier(Modifier::BOLD), "unlocked")
        } else {
            (Style::default().fg(theme.fg_muted), "locked")
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", achievement.icon), name_style),
            Span::styled(format!("{:<14}", achievement.name), name_style),
            Span::styled(status, Style::default().fg(theme.fg_muted).add_modifier(Modifier::ITALIC)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("     {}", achievement.description),
            Style::default().fg(theme.fg_secondary),
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

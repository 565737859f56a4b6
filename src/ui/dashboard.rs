//! Dashboard: program calendar and progress sidebar

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Wrap},
};

use super::layout::panel;
use crate::app::state::AppState;
use crate::calendar::{DayRecord, DayStatus, day_number};
use crate::stats::ProgressSummary;
use crate::theme::Theme;

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let [calendar, sidebar] =
        Layout::horizontal([Constraint::Min(40), Constraint::Length(36)]).areas(area);

    draw_calendar(frame, calendar, state, theme);
    if let Some(summary) = &state.summary {
        draw_progress(frame, sidebar, summary, theme);
    }
}

/// Glyph shown next to a day
pub fn status_symbol(status: DayStatus) -> &'static str {
    match status {
        DayStatus::Completed => "\u{2713}",
        DayStatus::Missed => "\u{2717}",
        DayStatus::Today => "\u{25CF}",
        DayStatus::Future => "\u{00b7}",
    }
}

fn draw_calendar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let block = panel(" Program calendar ", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(first) = state.days.first() else {
        let empty = Paragraph::new(Span::styled(
            "Your program has not started yet.",
            Style::default().fg(theme.fg_muted),
        ));
        frame.render_widget(empty, inner);
        return;
    };
    let start = first.date;

    let mut lines = vec![Line::from("")];
    for (week, days) in state.days.chunks(7).enumerate() {
        let mut spans =
            vec![Span::styled(format!(" Week {:<2} ", week + 1), Style::default().fg(theme.fg_muted))];
        for (offset, day) in days.iter().enumerate() {
            let selected = week * 7 + offset == state.calendar_cursor;
            spans.push(day_cell(day, selected, theme));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    if let Some(day) = state.selected_day() {
        lines.push(selected_detail(day, start, theme));
        lines.push(Line::from(""));
    }
    lines.push(legend(theme));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn day_cell(day: &DayRecord, selected: bool, theme: &Theme) -> Span<'static> {
    let mut style = Style::default().fg(theme.day_color(day.status));
    if day.clickable {
        style = style.add_modifier(Modifier::BOLD);
    }
    if selected {
        style = style.bg(theme.selection).add_modifier(Modifier::BOLD);
    }
    Span::styled(format!(" {} {} ", status_symbol(day.status), day.date.format("%b %d")), style)
}

fn selected_detail(day: &DayRecord, start: chrono::NaiveDate, theme: &Theme) -> Line<'static> {
    let action = match day.status {
        DayStatus::Today => "press Enter to start",
        DayStatus::Completed => "answered",
        DayStatus::Missed => "missed",
        DayStatus::Future => "not open yet",
    };
    Line::from(vec![
        Span::styled(
            format!(" Day {} ", day_number(start, day.date)),
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{}  ", day.date.format("%A, %B %-d")),
            Style::default().fg(theme.fg_primary),
        ),
        Span::styled(action, Style::default().fg(theme.day_color(day.status))),
    ])
}

fn legend(theme: &Theme) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for status in [DayStatus::Today, DayStatus::Completed, DayStatus::Missed, DayStatus::Future] {
        spans.push(Span::styled(
            format!("{} {}   ", status_symbol(status), status.label()),
            Style::default().fg(theme.day_color(status)),
        ));
    }
    Line::from(spans)
}

fn draw_progress(frame: &mut Frame, area: Rect, summary: &ProgressSummary, theme: &Theme) {
    let block = panel(" Progress ", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [gauge_area, _, details] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
            .areas(inner);

    let ratio = (summary.percent_complete / 100.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.success).bg(theme.bg_tertiary))
        .ratio(ratio)
        .label(format!("{:.0}%", summary.percent_complete));
    frame.render_widget(gauge, gauge_area);

    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!(" {label:<14}"), Style::default().fg(theme.fg_muted)),
            Span::styled(value, Style::default().fg(theme.fg_primary)),
        ])
    };

    let mut lines = vec![
        row("Completed", format!("{} / {}", summary.completed_count, summary.total_days)),
        row("Streak", format!("{} day{}", summary.streak, plural(summary.streak as usize))),
        row("Missed", summary.missed_count.to_string()),
        row("Success rate", format!("{:.0}%", summary.success_rate)),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Badges {}/{}", summary.unlocked_count(), summary.achievements.len()),
            Style::default().fg(theme.fg_secondary).add_modifier(Modifier::BOLD),
        )),
    ];
    let icons: Vec<Span> = summary
        .achievements
        .iter()
        .map(|a| {
            let style = if a.unlocked {
                Style::default().fg(theme.warning)
            } else {
                Style::default().fg(theme.fg_muted).add_modifier(Modifier::DIM)
            };
            Span::styled(format!(" {}", a.icon), style)
        })
        .collect();
    lines.push(Line::from(icons));

    frame.render_widget(Paragraph::new(lines), details);
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

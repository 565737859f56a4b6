//! Daily query screen

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::layout::panel;
use crate::quiz::{Difficulty, QuizState, option_letter};
use crate::theme::Theme;

pub fn draw(frame: &mut Frame, area: Rect, quiz: &QuizState, theme: &Theme) {
    let title = format!(" {} ", quiz.date.format("%A, %B %-d"));
    let block = panel(&title, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if quiz.loading {
        draw_loading(frame, inner, theme);
    } else if let Some(error) = &quiz.error {
        draw_error(frame, inner, error, theme);
    } else {
        let [scenario, progress, question] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .areas(inner);
        draw_scenario(frame, scenario, quiz, theme);
        draw_progress(frame, progress, quiz, theme);
        draw_question(frame, question, quiz, theme);
    }
}

fn draw_loading(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled("Loading today's questions...", Style::default().fg(theme.fg_primary))),
    ];

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

fn draw_error(frame: &mut Frame, area: Rect, error: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Could not load the questions",
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(error, Style::default().fg(theme.fg_secondary))),
        Line::from(""),
        Line::from(Span::styled("[Enter] Retry    [Esc] Calendar", Style::default().fg(theme.fg_muted))),
    ];

    let para = Paragraph::new(text).alignment(Alignment::Center).wrap(Wrap { trim: true });
    frame.render_widget(para, area);
}

fn difficulty_label(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "Easy",
        Difficulty::Medium => "Medium",
        Difficulty::Hard => "Hard",
    }
}

fn draw_scenario(frame: &mut Frame, area: Rect, quiz: &QuizState, theme: &Theme) {
    let Some(daily) = &quiz.quiz else {
        return;
    };
    let difficulty = daily.difficulty;
    let difficulty_color = match difficulty {
        Difficulty::Easy => theme.success,
        Difficulty::Medium => theme.warning,
        Difficulty::Hard => theme.error,
    };

    let mut lines = vec![Line::from(vec![
        Span::styled("Scenario ", Style::default().fg(theme.fg_muted)),
        Span::styled(
            format!("[{} \u{00d7}{}]", difficulty_label(difficulty), difficulty.weight()),
            Style::default().fg(difficulty_color),
        ),
    ])];
    if let Some(scenario) = &daily.scenario {
        lines.push(Line::from(Span::styled(
            scenario.clone(),
            Style::default().fg(theme.fg_primary).add_modifier(Modifier::ITALIC),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

/// One marker per question: answered, unanswered, and after submission right or wrong
fn draw_progress(frame: &mut Frame, area: Rect, quiz: &QuizState, theme: &Theme) {
    let results = quiz.grade.as_ref().map(|g| g.results.as_slice());
    let mut spans = Vec::new();

    for i in 0..quiz.questions().len() {
        let (marker, color) = match (results.and_then(|r| r.get(i)), quiz.answers.get(i)) {
            (Some(true), _) => ("\u{2713}", theme.success),
            (Some(false), _) => ("\u{2717}", theme.error),
            (None, Some(Some(_))) => ("\u{25CF}", theme.accent_primary),
            _ => ("\u{25CB}", theme.fg_muted),
        };
        let mut style = Style::default().fg(color);
        if i == quiz.current_question {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        spans.push(Span::styled(format!("Q{}{} ", i + 1, marker), style));
    }

    if quiz.submitted {
        let (correct, total) = quiz.score();
        let (text, color) = if quiz.passed() {
            (format!("  All {total} correct!"), theme.success)
        } else {
            (format!("  {correct}/{total} correct"), theme.warning)
        };
        spans.push(Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_question(frame: &mut Frame, area: Rect, quiz: &QuizState, theme: &Theme) {
    let current = quiz.current_question;
    let total = quiz.questions().len();

    let Some(question) = quiz.current() else {
        return;
    };
    let answer = quiz.answers.get(current).copied().flatten();

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Question {} of {}", current + 1, total),
            Style::default().fg(theme.fg_muted),
        )),
        Line::from(""),
        Line::from(Span::styled(
            question.question.clone(),
            Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (i, option) in question.options.iter().enumerate() {
        let highlighted = !quiz.submitted && i == quiz.highlighted_option;
        let chosen = answer == Some(i);
        let prefix = if chosen { "\u{25CF}" } else { "\u{25CB}" };

        let style = if quiz.submitted {
            if i == question.correct_answer {
                Style::default().fg(theme.success).add_modifier(Modifier::BOLD)
            } else if chosen {
                Style::default().fg(theme.error).add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(theme.fg_muted)
            }
        } else if highlighted {
            Style::default().fg(theme.accent_primary).bg(theme.selection).add_modifier(Modifier::BOLD)
        } else if chosen {
            Style::default().fg(theme.accent_primary)
        } else {
            Style::default().fg(theme.fg_secondary)
        };

        lines.push(Line::from(Span::styled(
            format!("  {} {}) {}", prefix, option_letter(i), option),
            style,
        )));
    }

    lines.push(Line::from(""));
    let hint = if quiz.submitted {
        "[\u{2190}/\u{2192}] Review    [Esc] Back to calendar"
    } else if quiz.unanswered() == 0 {
        "All questions answered. [s] Submit"
    } else {
        "[\u{2191}/\u{2193}] Option    [Enter] Answer    [\u{2190}/\u{2192}] Question    [s] Submit"
    };
    lines.push(Line::from(Span::styled(hint, Style::default().fg(theme.fg_muted))));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

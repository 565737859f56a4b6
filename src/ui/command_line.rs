//! Command line UI component

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::router::Screen;
use crate::app::state::{AppState, CommandMode};
use crate::theme::Theme;

/// Draw the command line at the bottom of the screen
pub fn draw(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let command_line = &state.command_line;

    let line = match command_line.mode {
        CommandMode::Command => {
            let text = format!(":{}", command_line.input.value);
            let style = Style::default().fg(theme.accent_primary);
            build_line_with_cursor(&text, command_line.input.cursor + 1, style, theme)
        }
        CommandMode::Normal => {
            if let Some(busy) = &state.busy {
                Line::from(Span::styled(busy.clone(), Style::default().fg(theme.info)))
            } else if let Some(msg) = &command_line.message {
                let style = if command_line.is_error {
                    Style::default().fg(theme.error)
                } else {
                    Style::default().fg(theme.success)
                };
                Line::from(Span::styled(msg.clone(), style))
            } else {
                Line::from(Span::styled(hint(state.screen), Style::default().fg(theme.fg_muted)))
            }
        }
    };

    frame.render_widget(Paragraph::new(line), area);
}

/// Key hint for the current screen
fn hint(screen: Screen) -> &'static str {
    match screen {
        Screen::Login => "Tab next field \u{00b7} Enter submit \u{00b7} Ctrl+N sign up / log in \u{00b7} Ctrl+C quit",
        Screen::TechSelection => "\u{2191}\u{2193} choose \u{00b7} Enter select \u{00b7} : commands",
        Screen::Dashboard => {
            "Arrows move \u{00b7} Enter open day \u{00b7} t stats \u{00b7} r refresh \u{00b7} e email \u{00b7} ? help"
        }
        Screen::Query(_) => {
            "\u{2191}\u{2193} option \u{00b7} \u{2190}\u{2192} question \u{00b7} Enter answer \u{00b7} s submit \u{00b7} Esc calendar"
        }
        Screen::Completion(_) => "Enter view calendar \u{00b7} c change technology",
        Screen::Stats => "Esc back to calendar",
        Screen::Certificate => "y copy share text \u{00b7} d download \u{00b7} :reset start over",
    }
}

/// Build a line with a visible cursor
fn build_line_with_cursor(
    text: &str,
    cursor_pos: usize,
    base_style: Style,
    theme: &Theme,
) -> Line<'static> {
    let chars: Vec<char> = text.chars().collect();
    let mut spans = Vec::new();

    if cursor_pos > 0 {
        let before: String = chars.iter().take(cursor_pos).collect();
        spans.push(Span::styled(before, base_style));
    }

    // Cursor character (or space if at end)
    let cursor_char = chars.get(cursor_pos).copied().unwrap_or(' ');
    let cursor_style =
        Style::default().fg(theme.bg_primary).bg(theme.fg_primary).add_modifier(Modifier::BOLD);
    spans.push(Span::styled(cursor_char.to_string(), cursor_style));

    if cursor_pos + 1 < chars.len() {
        let after: String = chars.iter().skip(cursor_pos + 1).collect();
        spans.push(Span::styled(after, base_style));
    }

    Line::from(spans)
}

/// Text input rendered with a cursor, or masked for passwords
pub fn input_line(
    value: &str,
    cursor: usize,
    focused: bool,
    masked: bool,
    theme: &Theme,
) -> Line<'static> {
    let shown: String = if masked { "\u{2022}".repeat(value.chars().count()) } else { value.into() };
    let style = Style::default().fg(theme.fg_primary);
    if focused {
        build_line_with_cursor(&shown, cursor, style, theme)
    } else {
        Line::from(Span::styled(shown, style))
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn render(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 1)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                draw(frame, area, state, &Theme::default());
            })
            .unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn cursor_splits_text_around_it() {
        let theme = Theme::default();
        let spans = |pos| build_line_with_cursor(":stats", pos, Style::default(), &theme).spans;
        assert_eq!(spans(0).len(), 2);
        assert_eq!(spans(3).len(), 3);
        assert_eq!(spans(6).len(), 2);
        assert_eq!(spans(3)[1].content, "a");
    }

    #[test]
    fn busy_text_wins_over_notices() {
        let mut state = AppState::default();
        state.command_line.set_error("Request timed out after 30s");
        assert!(render(&state).contains("Request timed out"));

        state.busy = Some("Submitting your answers...".into());
        assert!(render(&state).contains("Submitting your answers"));
    }

    #[test]
    fn hint_follows_screen() {
        let mut state = AppState::default();
        assert!(render(&state).contains("Ctrl+N"));
        state.screen = Screen::Stats;
        assert!(render(&state).contains("Esc back to calendar"));
    }

    #[test]
    fn password_is_masked() {
        let theme = Theme::default();
        let line = input_line("secret", 6, false, true, &theme);
        assert_eq!(line.spans[0].content, "\u{2022}".repeat(6));

        let focused = input_line("secret", 2, true, true, &theme);
        assert_eq!(focused.spans[1].content, "\u{2022}");
    }
}

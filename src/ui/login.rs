//! Login and sign-up form

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::command_line::input_line;
use super::layout::centered_fixed;
use crate::app::state::{FormField, FormMode, LoginForm};
use crate::theme::Theme;

pub fn draw(frame: &mut Frame, area: Rect, form: &LoginForm, theme: &Theme) {
    let fields = form.fields();
    let height = fields.len() as u16 * 3 + 6;
    let card = centered_fixed(56, height, area);

    let title = match form.mode {
        FormMode::Login => " Log in ",
        FormMode::SignUp => " Create an account ",
    };
    let block = Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary));
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let mut constraints = vec![Constraint::Length(2)];
    constraints.extend(fields.iter().map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Min(0));
    let rows = Layout::vertical(constraints).split(inner);

    let intro = Paragraph::new(Line::from(Span::styled(
        "Daily healthcare data challenges, 15 days to a certificate",
        Style::default().fg(theme.fg_muted),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(intro, rows[0]);

    let focused = form.focused();
    for (i, field) in fields.iter().enumerate() {
        draw_field(frame, rows[i + 1], form, *field, *field == focused, theme);
    }

    let switch = match form.mode {
        FormMode::Login => "No account yet? Ctrl+N to sign up",
        FormMode::SignUp => "Already registered? Ctrl+N to log in",
    };
    let footer = Paragraph::new(Line::from(Span::styled(switch, Style::default().fg(theme.info))))
        .alignment(Alignment::Center);
    frame.render_widget(footer, rows[fields.len() + 1]);
}

fn draw_field(
    frame: &mut Frame,
    area: Rect,
    form: &LoginForm,
    field: FormField,
    focused: bool,
    theme: &Theme,
) {
    let border = if focused { theme.border_focused } else { theme.border };
    let label_style = if focused {
        Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.fg_secondary)
    };
    let block = Block::default()
        .title(Span::styled(format!(" {} ", field.label()), label_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let line = match form.field(field) {
        Some(input) => {
            input_line(&input.value, input.cursor, focused, field == FormField::Password, theme)
        }
        None => Line::from(vec![
            Span::styled("\u{2039} ", Style::default().fg(theme.fg_muted)),
            Span::styled(
                format!("{} ({})", form.track.display_name(), form.track.code()),
                Style::default().fg(theme.fg_primary),
            ),
            Span::styled(" \u{203a}", Style::default().fg(theme.fg_muted)),
        ]),
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

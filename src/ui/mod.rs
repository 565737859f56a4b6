//! UI rendering components

pub mod certificate;
pub mod command_line;
pub mod completion;
pub mod dashboard;
pub mod layout;
pub mod login;
pub mod query;
pub mod stats;
pub mod tech_select;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
};

use crate::app::command::HELP;
use crate::app::router::Screen;
use crate::app::state::AppState;
use crate::certificate::Certificate;
use crate::config::Config;
use crate::theme::Theme;

/// Main draw function
pub fn draw(frame: &mut Frame, state: &AppState, config: &Config) {
    let theme = config.active_theme();
    let area = frame.area();

    frame.render_widget(Block::default().style(Style::default().bg(theme.bg_primary)), area);

    let regions = layout::regions(area, config.header);
    layout::draw_header(frame, regions.header, state, config.header, &theme);

    match state.screen {
        Screen::Login => login::draw(frame, regions.body, &state.login, &theme),
        Screen::TechSelection => tech_select::draw(frame, regions.body, state, &theme),
        Screen::Dashboard => dashboard::draw(frame, regions.body, state, &theme),
        Screen::Query(_) => {
            if let Some(quiz) = &state.quiz {
                query::draw(frame, regions.body, quiz, &theme);
            }
        }
        Screen::Completion(date) => completion::draw(frame, regions.body, state, date, &theme),
        Screen::Stats => {
            if let Some(summary) = &state.summary {
                stats::draw(frame, regions.body, summary, &theme);
            }
        }
        Screen::Certificate => {
            let cert = state
                .profile
                .as_ref()
                .and_then(|profile| Certificate::new(profile, &state.progress));
            certificate::draw(frame, regions.body, cert.as_ref(), &theme);
        }
    }

    command_line::draw(frame, regions.command_line, state, &theme);

    if state.show_help {
        draw_help(frame, area, &theme);
    }
}

fn draw_help(frame: &mut Frame, area: Rect, theme: &Theme) {
    let height = HELP.len() as u16 + 4;
    let popup = layout::centered_fixed(60, height, area);
    frame.render_widget(Clear, popup);

    let block = layout::panel(" Help ", theme).style(Style::default().bg(theme.bg_secondary));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines: Vec<Line> = HELP
        .iter()
        .map(|(keys, description)| {
            Line::from(vec![
                Span::styled(
                    format!(" {keys:<18}"),
                    Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
                ),
                Span::styled(*description, Style::default().fg(theme.fg_primary)),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Press ? or Esc to close",
        Style::default().fg(theme.fg_muted),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

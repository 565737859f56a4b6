//! Layout utilities and common components

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::state::AppState;
use crate::config::HeaderVariant;
use crate::theme::Theme;

/// Screen regions
pub struct Regions {
    pub header: Rect,
    pub body: Rect,
    pub command_line: Rect,
}

/// Split the frame into header, body and command line
pub fn regions(area: Rect, header: HeaderVariant) -> Regions {
    let header_height = match header {
        HeaderVariant::Full => 3,
        HeaderVariant::Minimal => 1,
    };
    let [header, body, command_line] = Layout::vertical([
        Constraint::Length(header_height),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    Regions { header, body, command_line }
}

/// Draw the header bar
pub fn draw_header(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    variant: HeaderVariant,
    theme: &Theme,
) {
    let title = Span::styled(
        " Healthcare Analysis HQ ",
        Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
    );

    match variant {
        HeaderVariant::Minimal => {
            let line = Line::from(vec![
                title,
                Span::styled(state.screen.title(), Style::default().fg(theme.fg_muted)),
            ]);
            frame.render_widget(
                Paragraph::new(line).style(Style::default().bg(theme.bg_secondary)),
                area,
            );
        }
        HeaderVariant::Full => {
            let block = Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.border))
                .style(Style::default().bg(theme.bg_secondary));
            let inner = block.inner(area);
            frame.render_widget(block, area);

            let [left, right] =
                Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .areas(inner);

            let left_line = Line::from(vec![
                title,
                Span::styled("\u{2502} ", Style::default().fg(theme.border)),
                Span::styled(state.screen.title(), Style::default().fg(theme.fg_secondary)),
            ]);
            frame.render_widget(Paragraph::new(left_line), left);

            let mut user = Vec::new();
            if let Some(profile) = &state.profile {
                user.push(Span::styled(
                    profile.name.clone(),
                    Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD),
                ));
                user.push(Span::styled(
                    format!("  {} \u{00b7} {}", profile.track.code(), profile.batch_code),
                    Style::default().fg(theme.fg_muted),
                ));
                if let Some(tech) = profile.technology {
                    user.push(Span::styled(
                        format!(" \u{00b7} {}", tech.display_name()),
                        Style::default().fg(theme.accent_secondary),
                    ));
                }
                user.push(Span::raw(" "));
            }
            frame.render_widget(Paragraph::new(Line::from(user)).alignment(Alignment::Right), right);
        }
    }
}

/// Bordered block with a title
pub fn panel<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.bg_primary))
}

/// Rectangle of a fixed size centered in `r`, shrunk to fit
pub fn centered_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

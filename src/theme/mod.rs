//! Theming system for HAQ

mod clinic;
mod tokyo_night;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::calendar::DayStatus;

/// `0xRRGGBB` as a terminal color
const fn hex(rgb: u32) -> Color {
    Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// Colors used across every screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,

    pub bg_primary: Color,
    pub bg_secondary: Color,
    pub bg_tertiary: Color,

    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,

    pub accent_primary: Color,
    pub accent_secondary: Color,

    // Notices and quiz feedback
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // Calendar cells
    pub day_completed: Color,
    pub day_missed: Color,
    pub day_today: Color,
    pub day_future: Color,

    pub border: Color,
    pub border_focused: Color,
    pub selection: Color,
    pub cursor: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::tokyo_night()
    }
}

impl Theme {
    /// Look up a built-in theme by name (case-insensitive)
    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "tokyo night" | "tokyo-night" => Some(Self::tokyo_night()),
            "clinic" => Some(Self::clinic()),
            _ => None,
        }
    }

    /// Cell color for a calendar day
    pub fn day_color(&self, status: DayStatus) -> Color {
        match status {
            DayStatus::Completed => self.day_completed,
            DayStatus::Missed => self.day_missed,
            DayStatus::Today => self.day_today,
            DayStatus::Future => self.day_future,
        }
    }
}

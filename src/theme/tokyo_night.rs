//! Tokyo Night: the default dark palette

use super::{Theme, hex};

impl Theme {
    pub fn tokyo_night() -> Self {
        Theme {
            name: "Tokyo Night".to_string(),

            bg_primary: hex(0x1a1b26),
            bg_secondary: hex(0x24283b),
            bg_tertiary: hex(0x414868),

            fg_primary: hex(0xa9b1d6),
            fg_secondary: hex(0xc0caf5),
            fg_muted: hex(0x565f89),

            accent_primary: hex(0x7aa2f7),
            accent_secondary: hex(0xbb9af7),

            success: hex(0x9ece6a),
            warning: hex(0xe0af68),
            error: hex(0xf7768e),
            info: hex(0x7dcfff),

            day_completed: hex(0x9ece6a),
            day_missed: hex(0xf7768e),
            day_today: hex(0xff9e64),
            day_future: hex(0x565f89),

            border: hex(0x414868),
            border_focused: hex(0x7aa2f7),
            selection: hex(0x283457),
            cursor: hex(0xc0caf5),
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::Color;

    use super::*;

    #[test]
    fn today_stands_out_from_future_days() {
        let theme = Theme::tokyo_night();
        assert_eq!(theme.day_today, Color::Rgb(255, 158, 100));
        assert_ne!(theme.day_today, theme.day_future);
    }
}

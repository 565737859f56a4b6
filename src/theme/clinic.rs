//! Clinic: light background with teal accents

use super::{Theme, hex};

impl Theme {
    pub fn clinic() -> Self {
        Theme {
            name: "Clinic".to_string(),

            bg_primary: hex(0xf7fafa),
            bg_secondary: hex(0xe8f1f2),
            bg_tertiary: hex(0xcddee0),

            fg_primary: hex(0x1f2933),
            fg_secondary: hex(0x344054),
            fg_muted: hex(0x788696),

            accent_primary: hex(0x0d9488),
            accent_secondary: hex(0x2563eb),

            success: hex(0x16a34a),
            warning: hex(0xd97706),
            error: hex(0xdc2626),
            info: hex(0x0284c7),

            day_completed: hex(0x16a34a),
            day_missed: hex(0xdc2626),
            day_today: hex(0x0d9488),
            day_future: hex(0xa0aec0),

            border: hex(0xcddee0),
            border_focused: hex(0x0d9488),
            selection: hex(0xccece8),
            cursor: hex(0x1f2933),
        }
    }
}

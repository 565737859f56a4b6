//! Application state definitions

use std::time::Instant;

use chrono::NaiveDate;

use super::router::Screen;
use crate::calendar::DayRecord;
use crate::config::profile::{Technology, Track, UserProfile};
use crate::config::progress::ProgressSets;
use crate::config::session::UserSession;
use crate::quiz::QuizState;
use crate::stats::ProgressSummary;

/// Single-line text input with a character cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    pub value: String,
    /// Cursor position in characters
    pub cursor: usize,
}

impl TextField {
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    /// Convert character index to byte index
    fn char_to_byte_index(&self, char_idx: usize) -> usize {
        self.value.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(self.value.len())
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    /// Insert a character at cursor
    pub fn insert_char(&mut self, c: char) {
        let byte_idx = self.char_to_byte_index(self.cursor);
        self.value.insert(byte_idx, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_idx = self.char_to_byte_index(self.cursor);
            self.value.remove(byte_idx);
        }
    }

    /// Delete character at cursor
    pub fn delete_char_forward(&mut self) {
        if self.cursor < self.char_count() {
            let byte_idx = self.char_to_byte_index(self.cursor);
            self.value.remove(byte_idx);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Value with surrounding whitespace removed
    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }
}

/// Login or sign-up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Login,
    SignUp,
}

/// Inputs on the login screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Track,
    BatchCode,
    Email,
    Password,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Track => "Track",
            FormField::BatchCode => "Batch code",
            FormField::Email => "Email",
            FormField::Password => "Password",
        }
    }
}

/// State of the login / sign-up form
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub mode: FormMode,
    pub name: TextField,
    pub track: Track,
    pub batch_code: TextField,
    pub email: TextField,
    pub password: TextField,
    /// Index into [`LoginForm::fields`]
    pub focus: usize,
}

impl LoginForm {
    /// Fields shown in the current mode, top to bottom
    pub fn fields(&self) -> &'static [FormField] {
        match self.mode {
            FormMode::Login => &[FormField::Email, FormField::Password],
            FormMode::SignUp => &[
                FormField::Name,
                FormField::Track,
                FormField::BatchCode,
                FormField::Email,
                FormField::Password,
            ],
        }
    }

    pub fn focused(&self) -> FormField {
        let fields = self.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields().len();
    }

    pub fn focus_previous(&mut self) {
        let len = self.fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    /// Switch between login and sign-up, keeping the email
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            FormMode::Login => FormMode::SignUp,
            FormMode::SignUp => FormMode::Login,
        };
        self.focus = 0;
        self.password.clear();
    }

    /// Text input for a field; the track selector has none
    pub fn field_mut(&mut self, field: FormField) -> Option<&mut TextField> {
        match field {
            FormField::Name => Some(&mut self.name),
            FormField::Track => None,
            FormField::BatchCode => Some(&mut self.batch_code),
            FormField::Email => Some(&mut self.email),
            FormField::Password => Some(&mut self.password),
        }
    }

    pub fn field(&self, field: FormField) -> Option<&TextField> {
        match field {
            FormField::Name => Some(&self.name),
            FormField::Track => None,
            FormField::BatchCode => Some(&self.batch_code),
            FormField::Email => Some(&self.email),
            FormField::Password => Some(&self.password),
        }
    }

    /// Text input under the cursor
    pub fn focused_input(&mut self) -> Option<&mut TextField> {
        self.field_mut(self.focused())
    }

    /// After a successful sign-up: log in with the same email
    pub fn switch_to_login(&mut self) {
        self.mode = FormMode::Login;
        self.password.clear();
        self.focus = 1;
    }
}

/// Entries on the technology selection screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TechOption {
    Available(Technology),
    /// Listed, not yet selectable
    ComingSoon(&'static str),
}

impl TechOption {
    pub const ALL: [TechOption; 3] = [
        TechOption::Available(Technology::Sql),
        TechOption::Available(Technology::Python),
        TechOption::ComingSoon("Statistics"),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TechOption::Available(tech) => tech.display_name(),
            TechOption::ComingSoon(name) => name,
        }
    }
}

/// Command line mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommandMode {
    /// Showing status messages
    #[default]
    Normal,
    /// Accepting : commands
    Command,
}

/// State for the command line input and notice bar
#[derive(Debug, Clone, Default)]
pub struct CommandLineState {
    pub mode: CommandMode,
    pub input: TextField,
    /// Notice to display when not in input mode
    pub message: Option<String>,
    pub is_error: bool,
    pub history: Vec<String>,
    /// Current history index when navigating
    pub history_index: Option<usize>,
}

impl CommandLineState {
    /// Maximum number of history entries to keep
    const MAX_HISTORY: usize = 100;

    pub fn enter_command_mode(&mut self) {
        self.mode = CommandMode::Command;
        self.input.clear();
        self.message = None;
        self.history_index = None;
    }

    pub fn exit_input_mode(&mut self) {
        self.mode = CommandMode::Normal;
        self.input.clear();
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = true;
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn is_input_mode(&self) -> bool {
        self.mode == CommandMode::Command
    }

    pub fn add_to_history(&mut self, cmd: String) {
        if !cmd.is_empty() && self.history.last() != Some(&cmd) {
            if self.history.len() >= Self::MAX_HISTORY {
                self.history.remove(0);
            }
            self.history.push(cmd);
        }
    }

    pub fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let index = match self.history_index {
            None => self.history.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.history_index = Some(index);
        self.input = TextField::with_value(self.history[index].clone());
    }

    pub fn history_down(&mut self) {
        if let Some(i) = self.history_index {
            if i + 1 < self.history.len() {
                self.history_index = Some(i + 1);
                self.input = TextField::with_value(self.history[i + 1].clone());
            } else {
                self.history_index = None;
                self.input.clear();
            }
        }
    }
}

/// Full application state
#[derive(Debug, Default)]
pub struct AppState {
    pub screen: Screen,

    pub profile: Option<UserProfile>,
    pub session: Option<UserSession>,
    pub progress: ProgressSets,
    /// Program start, when known
    pub signup_date: Option<NaiveDate>,

    /// Calendar for `[signup, today + 7]`
    pub days: Vec<DayRecord>,
    pub summary: Option<ProgressSummary>,
    /// Selected calendar cell
    pub calendar_cursor: usize,

    pub login: LoginForm,
    /// Selected entry on the technology screen
    pub tech_cursor: usize,

    pub quiz: Option<QuizState>,
    /// Fully correct day waiting for the completion screen
    pub pending_completion: Option<(NaiveDate, Instant)>,

    /// Text shown while a request is in flight
    pub busy: Option<String>,
    pub show_help: bool,
    pub command_line: CommandLineState,
}

impl AppState {
    /// Record under the calendar cursor
    pub fn selected_day(&self) -> Option<&DayRecord> {
        self.days.get(self.calendar_cursor)
    }

    /// Move the calendar cursor by `delta` cells, clamped to the window
    pub fn move_calendar(&mut self, delta: isize) {
        if self.days.is_empty() {
            return;
        }
        let last = self.days.len() - 1;
        self.calendar_cursor = self.calendar_cursor.saturating_add_signed(delta).min(last);
    }

    pub fn move_tech(&mut self, delta: isize) {
        let last = TechOption::ALL.len() - 1;
        self.tech_cursor = self.tech_cursor.saturating_add_signed(delta).min(last);
    }

    pub fn display_name(&self) -> &str {
        self.profile.as_ref().map(|p| p.name.as_str()).unwrap_or("")
    }
}

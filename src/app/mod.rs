//! Application state and event handling

pub mod command;
pub mod controller;
pub mod error;
pub mod input;
pub mod router;
pub mod state;
pub mod validation;

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::config::Config;
use crate::config::storage::LocalStore;
use crate::gateway::Backend;
use crate::ui;
use command::{Command, ParseResult, parse_command};
use controller::{Clock, Controller};
use input::{Action, global_action, key_to_action};
use router::Screen;
use state::{FormField, FormMode};

/// The main application
pub struct App {
    controller: Controller<Backend>,

    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Result<Self> {
        let backend = Backend::from_config(&config)?;
        let store = LocalStore::open_default()?;
        let controller = Controller::new(backend, store, config, Clock::System);
        let terminal = Self::setup_terminal()?;

        Ok(Self { controller, terminal })
    }

    /// Set up the terminal for TUI rendering
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore the terminal to its original state
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let Self { controller, terminal } = self;
        terminal.draw(|frame| {
            ui::draw(frame, &controller.state, controller.config());
        })?;
        Ok(())
    }

    /// Show a loading line and redraw before a request is awaited
    fn busy(&mut self, message: &str) -> Result<()> {
        self.controller.state.busy = Some(message.to_string());
        self.draw()
    }

    fn idle(&mut self) {
        self.controller.state.busy = None;
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> Result<()> {
        // Set up panic hook to restore terminal
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        loop {
            self.draw()?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        match self.handle_key(key).await {
                            Ok(true) => break,
                            Ok(false) => {}
                            Err(e) => {
                                tracing::error!("Error handling key: {:#}", e);
                                self.controller.state.command_line.set_error(format!("{e:#}"));
                            }
                        }
                    }
                }
            }

            let ticked = self.controller.tick(Instant::now());
            self.controller.report(ticked);
        }

        // A completed day must not be lost by quitting inside the delay
        if let Err(e) = self.controller.flush_pending() {
            tracing::error!("Failed to save pending completion: {}", e);
        }

        self.restore_terminal()?;
        Ok(())
    }

    /// Handle a key press, returns true if should exit
    async fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        match global_action(key.code, key.modifiers) {
            Some(Action::Quit) => return Ok(true),
            Some(Action::ToggleForm) if self.controller.state.screen == Screen::Login => {
                self.controller.state.login.toggle_mode();
                self.controller.state.command_line.clear_message();
                return Ok(false);
            }
            _ => {}
        }

        if self.controller.state.show_help {
            self.controller.state.show_help = false;
            return Ok(false);
        }

        if self.controller.state.command_line.is_input_mode() {
            return self.handle_command_key(key.code).await;
        }

        if self.controller.state.screen == Screen::Login {
            self.handle_login_key(key.code).await?;
            return Ok(false);
        }

        let Some(action) = key_to_action(key.code, self.controller.config().vim_mode) else {
            return Ok(false);
        };

        match action {
            Action::Command => {
                self.controller.state.command_line.enter_command_mode();
                return Ok(false);
            }
            Action::Help => {
                self.controller.state.show_help = true;
                return Ok(false);
            }
            _ => {}
        }

        match self.controller.state.screen {
            Screen::Login => {}
            Screen::TechSelection => self.handle_tech_action(action),
            Screen::Dashboard => self.handle_dashboard_action(action).await?,
            Screen::Query(_) => self.handle_query_action(action).await?,
            Screen::Completion(_) => match action {
                Action::Select | Action::Back => {
                    let result = self.controller.view_calendar();
                    self.controller.report(result);
                }
                Action::ChangeTechnology => {
                    let result = self.controller.change_technology();
                    self.controller.report(result);
                }
                _ => {}
            },
            Screen::Stats => {
                if matches!(action, Action::Select | Action::Back | Action::Stats) {
                    let result = self.controller.view_calendar();
                    self.controller.report(result);
                }
            }
            Screen::Certificate => match action {
                Action::Share => self.share_certificate(),
                Action::Download => self.download_certificate(),
                _ => {}
            },
        }
        Ok(false)
    }

    async fn handle_login_key(&mut self, key: KeyCode) -> Result<()> {
        let form = &mut self.controller.state.login;
        let focused = form.focused();

        match key {
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
            KeyCode::Left if focused == FormField::Track => form.track = form.track.previous(),
            KeyCode::Right if focused == FormField::Track => form.track = form.track.next(),
            KeyCode::Enter => {
                let last = form.focus + 1 == form.fields().len();
                if !last {
                    form.focus_next();
                    return Ok(());
                }
                let mode = form.mode;
                match mode {
                    FormMode::Login => {
                        self.busy("Logging in...")?;
                        let result = self.controller.login().await;
                        self.idle();
                        self.controller.report(result);
                    }
                    FormMode::SignUp => {
                        self.busy("Creating your account...")?;
                        let result = self.controller.sign_up().await;
                        self.idle();
                        self.controller.report(result);
                    }
                }
            }
            other => {
                if let Some(input) = form.focused_input() {
                    match other {
                        KeyCode::Char(c) => input.insert_char(c),
                        KeyCode::Backspace => input.delete_char(),
                        KeyCode::Delete => input.delete_char_forward(),
                        KeyCode::Left => input.move_left(),
                        KeyCode::Right => input.move_right(),
                        KeyCode::Home => input.move_start(),
                        KeyCode::End => input.move_end(),
                        _ => {}
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_tech_action(&mut self, action: Action) {
        match action {
            Action::Up | Action::Left | Action::Previous => self.controller.state.move_tech(-1),
            Action::Down | Action::Right | Action::Next => self.controller.state.move_tech(1),
            Action::Choose(n) => {
                self.controller.state.tech_cursor = n;
                let result = self.controller.select_technology();
                self.controller.report(result);
            }
            Action::Select => {
                let result = self.controller.select_technology();
                self.controller.report(result);
            }
            _ => {}
        }
    }

    async fn handle_dashboard_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Left => self.controller.state.move_calendar(-1),
            Action::Right => self.controller.state.move_calendar(1),
            Action::Up => self.controller.state.move_calendar(-7),
            Action::Down => self.controller.state.move_calendar(7),
            Action::Select => {
                let opened = self.controller.open_selected_day();
                if self.controller.report(opened).is_some() {
                    self.load_questions().await?;
                }
            }
            Action::Stats => {
                let result = self.controller.open_stats();
                self.controller.report(result);
            }
            Action::Refresh => self.refresh().await?,
            Action::Email => {
                let result = self.controller.email();
                self.controller.report(result);
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_query_action(&mut self, action: Action) -> Result<()> {
        let Some(quiz) = self.controller.state.quiz.as_mut() else {
            return Ok(());
        };

        match action {
            Action::Up => quiz.previous_option(),
            Action::Down => quiz.next_option(),
            Action::Left | Action::Previous => quiz.previous_question(),
            Action::Right | Action::Next => quiz.next_question(),
            Action::Choose(n) => {
                let question = quiz.current_question;
                if quiz.choose(question, n) {
                    quiz.highlighted_option = n;
                }
            }
            Action::Select if quiz.error.is_some() => self.load_questions().await?,
            Action::Select => {
                if quiz.choose_highlighted() {
                    quiz.next_question();
                }
            }
            Action::Submit => {
                self.busy("Submitting your answers...")?;
                let result = self.controller.submit_quiz().await;
                self.idle();
                self.controller.report(result);
            }
            Action::Back => {
                let result = self.controller.view_calendar();
                self.controller.report(result);
            }
            Action::Email => {
                let result = self.controller.email();
                self.controller.report(result);
            }
            _ => {}
        }
        Ok(())
    }

    async fn load_questions(&mut self) -> Result<()> {
        self.draw()?;
        let result = self.controller.load_questions().await;
        self.controller.report(result);
        Ok(())
    }

    async fn refresh(&mut self) -> Result<()> {
        self.busy("Refreshing progress...")?;
        let result = self.controller.refresh_attempted_days().await;
        self.idle();
        if self.controller.report(result).is_some() {
            self.controller.state.command_line.set_message("Progress refreshed");
        }
        Ok(())
    }

    fn share_certificate(&mut self) {
        let text = self.controller.share_text();
        let Some(text) = self.controller.report(text) else {
            return;
        };
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => {
                self.controller.state.command_line.set_message("Share text copied to clipboard")
            }
            Err(e) => {
                tracing::warn!("Clipboard unavailable: {}", e);
                self.controller.state.command_line.set_error(format!("Could not copy: {e}"));
            }
        }
    }

    fn download_certificate(&mut self) {
        let dir = match Config::data_dir() {
            Ok(dir) => dir,
            Err(e) => {
                self.controller.state.command_line.set_error(format!("{e:#}"));
                return;
            }
        };
        let result = self.controller.download_certificate(&dir);
        self.controller.report(result);
    }

    /// Handle a key while the command line is open
    async fn handle_command_key(&mut self, key: KeyCode) -> Result<bool> {
        let command_line = &mut self.controller.state.command_line;
        match key {
            KeyCode::Esc => command_line.exit_input_mode(),
            KeyCode::Enter => {
                let input = command_line.input.value.clone();
                command_line.add_to_history(input.clone());
                command_line.exit_input_mode();
                return match parse_command(&input) {
                    ParseResult::Ok(command) => self.execute_command(command).await,
                    ParseResult::UnknownCommand(cmd) => {
                        command_line.set_error(format!("Unknown command: {cmd}"));
                        Ok(false)
                    }
                };
            }
            KeyCode::Backspace if command_line.input.value.is_empty() => {
                command_line.exit_input_mode()
            }
            KeyCode::Backspace => command_line.input.delete_char(),
            KeyCode::Delete => command_line.input.delete_char_forward(),
            KeyCode::Left => command_line.input.move_left(),
            KeyCode::Right => command_line.input.move_right(),
            KeyCode::Home => command_line.input.move_start(),
            KeyCode::End => command_line.input.move_end(),
            KeyCode::Up => command_line.history_up(),
            KeyCode::Down => command_line.history_down(),
            KeyCode::Char(c) => command_line.input.insert_char(c),
            _ => {}
        }
        Ok(false)
    }

    async fn execute_command(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Quit => return Ok(true),
            Command::Nop => self.controller.state.command_line.clear_message(),
            Command::Help => self.controller.state.show_help = true,
            Command::Logout => {
                self.busy("Logging out...")?;
                let result = self.controller.logout().await;
                self.idle();
                self.controller.report(result);
            }
            Command::Reset => {
                let result = self.controller.reset();
                self.controller.report(result);
            }
            Command::Stats => {
                let result = self.controller.open_stats();
                self.controller.report(result);
            }
            Command::Calendar => {
                let result = self.controller.view_calendar();
                self.controller.report(result);
            }
            Command::Refresh => self.refresh().await?,
            Command::Email => {
                let result = self.controller.email();
                self.controller.report(result);
            }
            Command::Share => self.share_certificate(),
            Command::Download => self.download_certificate(),
        }
        Ok(false)
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

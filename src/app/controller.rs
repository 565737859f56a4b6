//! Application core: user actions, persistence and routing
//!
//! Every action follows the same path: validate, call the gateway when needed,
//! update and persist the store, recompute the calendar and progress, then let
//! the router pick the next screen. The terminal loop in [`super::App`] only
//! translates keys into these calls.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

use super::error::ActionError;
use super::router::{Event, Screen};
use super::state::{AppState, TechOption, TextField};
use super::validation::{validate_login, validate_sign_up};
use crate::calendar::{DayStatus, compute_day_statuses, missed_days, record_for};
use crate::certificate::Certificate;
use crate::config::Config;
use crate::config::profile::UserProfile;
use crate::config::progress::{ProgressSets, load_signup_date, save_signup_date};
use crate::config::session::UserSession;
use crate::config::storage::{LocalStore, keys};
use crate::gateway::{Gateway, LoginRequest, LogoutRequest, SignUpRequest, SubmitOutcome};
use crate::quiz::{QuizError, QuizState, build_submission};
use crate::stats::{certificate_eligible_for, compute_progress};

/// Pause between a fully correct submission and the completion screen
pub const COMPLETION_DELAY: Duration = Duration::from_secs(2);

/// Source of the local wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    /// Always reports the same instant
    Fixed(NaiveDateTime),
}

impl Clock {
    pub fn now(&self) -> NaiveDateTime {
        let now = match self {
            Clock::System => Local::now().naive_local(),
            Clock::Fixed(at) => *at,
        };
        now.with_nanosecond(0).unwrap_or(now)
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Drives the application state
pub struct Controller<G> {
    pub state: AppState,
    gateway: G,
    store: LocalStore,
    config: Config,
    clock: Clock,
}

impl<G: Gateway> Controller<G> {
    /// Create a controller and hydrate it from the store
    pub fn new(gateway: G, store: LocalStore, config: Config, clock: Clock) -> Self {
        let mut controller = Self { state: AppState::default(), gateway, store, config, clock };
        controller.hydrate();
        controller
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Rebuild state from persisted values
    fn hydrate(&mut self) {
        let now = self.clock.now();
        let max_age = self.config.session_max_age_hours;
        let mut session = UserSession::load(&self.store);
        if let Some(expired) = session.as_ref().filter(|s| s.is_expired(now, max_age)) {
            tracing::info!("Discarding expired session for user {}", expired.user_id);
            if let Err(e) = self.store.remove_item(keys::SESSION) {
                tracing::warn!("Failed to remove expired session: {:#}", e);
            }
            session = None;
        }

        self.state.profile = UserProfile::load(&self.store);
        self.state.session = session;
        self.state.progress = ProgressSets::load(&self.store);
        self.state.signup_date = load_signup_date(&self.store);
        self.state.screen =
            Screen::initial(self.state.profile.as_ref(), self.state.session.is_some());

        if let Some(session) = &self.state.session {
            self.state.login.email = TextField::with_value(&session.login_email);
        }

        self.recompute();
        self.focus_today();
        self.route();
        tracing::debug!("Hydrated on {:?}", self.state.screen);
    }

    /// First day of the program
    pub fn program_start(&self) -> NaiveDate {
        self.state
            .signup_date
            .or_else(|| self.state.session.as_ref().map(|s| s.login_date))
            .unwrap_or_else(|| self.today())
    }

    /// Recompute the calendar, missed days and progress summary
    fn recompute(&mut self) {
        let today = self.today();
        let start = self.program_start();

        self.state.days = compute_day_statuses(start, &self.state.progress.attempted_set(), today);
        self.state.progress.missed = missed_days(&self.state.days);

        let elapsed = u32::try_from((today - start).num_days() + 1).ok();
        self.state.summary =
            Some(compute_progress(&self.state.progress, self.config.progress_strategy, elapsed));

        if self.state.calendar_cursor >= self.state.days.len() {
            self.state.calendar_cursor = self.state.days.len().saturating_sub(1);
        }
    }

    /// Put the calendar cursor on today, or the last day before it
    fn focus_today(&mut self) {
        let today = self.today();
        self.state.calendar_cursor =
            self.state.days.iter().rposition(|d| d.date <= today).unwrap_or(0);
    }

    /// Force the certificate when it has been earned
    fn route(&mut self) {
        let eligible = certificate_eligible_for(&self.state.progress);
        let next = self.state.screen.route(eligible);
        if next != self.state.screen {
            tracing::info!("Certificate earned, routing from {:?}", self.state.screen);
            self.state.quiz = None;
            self.state.screen = next;
        }
    }

    /// Store progress after a mutation and re-run routing
    fn persist_progress(&mut self) -> Result<(), ActionError> {
        self.recompute();
        self.state.progress.save(&mut self.store)?;
        self.route();
        Ok(())
    }

    fn notice(&mut self, message: impl Into<String>) {
        self.state.command_line.set_message(message);
    }

    /// Show a failed action on the command line
    pub fn report<T>(&mut self, result: Result<T, ActionError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                match &e {
                    ActionError::Gateway(inner) => {
                        tracing::warn!("Gateway call failed ({}): {}", inner.kind(), inner)
                    }
                    ActionError::Storage(inner) => tracing::error!("Storage failure: {:#}", inner),
                    _ => tracing::debug!("Action refused: {}", e),
                }
                self.state.command_line.set_error(e.to_string());
                None
            }
        }
    }

    fn require_session(&self) -> Result<&UserSession, ActionError> {
        self.state.session.as_ref().ok_or_else(|| ActionError::not_allowed("Please log in first"))
    }

    /// Submit the sign-up form
    pub async fn sign_up(&mut self) -> Result<(), ActionError> {
        let form = &self.state.login;
        let name = form.name.trimmed().to_string();
        let batch_code = form.batch_code.trimmed().to_string();
        let email = form.email.trimmed().to_string();
        let password = form.password.value.clone();
        let track = form.track;

        validate_sign_up(&name, &batch_code, &email, &password)?;

        let request = SignUpRequest {
            name: name.clone(),
            track,
            batch_code: batch_code.clone(),
            email,
            password,
            timezone: Local::now().format("%:z").to_string(),
            local_datetime: self.clock.now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        let message = self.gateway.sign_up(&request).await?;

        let profile = UserProfile::new(name, track, batch_code);
        profile.save(&mut self.store)?;
        self.state.profile = Some(profile);
        self.state.login.switch_to_login();
        tracing::info!("Signed up {}", request.email);
        self.notice(format!("{}. Please log in.", message.trim_end_matches('.')));
        Ok(())
    }

    /// Submit the login form
    pub async fn login(&mut self) -> Result<(), ActionError> {
        let email = self.state.login.email.trimmed().to_string();
        let password = self.state.login.password.value.clone();
        validate_login(&email, &password)?;

        let now = self.clock.now();
        let request = LoginRequest {
            email,
            password,
            user_date: now.format("%Y-%m-%d").to_string(),
            user_time: now.format("%H:%M:%S").to_string(),
        };
        let grant = self.gateway.login(&request).await?;

        let session = UserSession {
            user_id: grant.user.user_id,
            login_email: request.email,
            login_date: now.date(),
            login_time: now.time(),
            user_log_id: grant.user_log_id,
        };
        session.save(&mut self.store)?;

        let profile =
            UserProfile::new(grant.user.name.clone(), grant.user.track(), grant.user.batch_code.clone());
        profile.save(&mut self.store)?;

        tracing::info!("User {} logged in", session.user_id);
        self.state.session = Some(session);
        self.state.profile = Some(profile);
        self.state.login.password.clear();
        self.state.tech_cursor = 0;
        self.state.screen = self.state.screen.on(Event::LoggedIn);

        match self.refresh_attempted_days().await {
            Ok(()) => self.notice(format!("Welcome, {}!", grant.user.name)),
            Err(e) => {
                tracing::warn!("Could not load attempted days: {}", e);
                self.recompute();
                self.route();
                self.state
                    .command_line
                    .set_error(format!("Logged in, but progress could not be loaded: {e}"));
            }
        }
        Ok(())
    }

    /// Pull the program start and attempted days from the backend
    pub async fn refresh_attempted_days(&mut self) -> Result<(), ActionError> {
        let user_id = self.require_session()?.user_id;
        let days = self.gateway.attempted_days(user_id).await?;

        if let Some(date) = days.signup_date {
            self.state.signup_date = Some(date);
            save_signup_date(&mut self.store, date)?;
        }
        let count = days.attempted_days.len();
        self.state.progress.merge_remote_attempted(days.attempted_days);
        self.persist_progress()?;
        self.focus_today();
        tracing::debug!("Refreshed {} attempted days for user {}", count, user_id);
        Ok(())
    }

    /// Choose the entry under the technology cursor
    pub fn select_technology(&mut self) -> Result<(), ActionError> {
        let option = TechOption::ALL[self.state.tech_cursor.min(TechOption::ALL.len() - 1)];
        self.choose_technology(option)
    }

    pub fn choose_technology(&mut self, option: TechOption) -> Result<(), ActionError> {
        let TechOption::Available(technology) = option else {
            return Err(ActionError::not_allowed(format!("{} is coming soon", option.label())));
        };
        let Some(profile) = self.state.profile.as_mut() else {
            return Err(ActionError::not_allowed("Please log in first"));
        };

        profile.technology = Some(technology);
        profile.save(&mut self.store)?;

        self.state.screen = self.state.screen.on(Event::TechnologyChosen);
        self.focus_today();
        self.route();
        self.notice(format!("{} selected. Pick today's date to start", technology.display_name()));
        Ok(())
    }

    /// Open the quiz for a calendar day, if it can be taken
    pub fn open_day(&mut self, date: NaiveDate) -> Result<(), ActionError> {
        if self.state.screen != Screen::Dashboard {
            return Err(ActionError::not_allowed("Open a day from the dashboard"));
        }
        let Some(record) = record_for(&self.state.days, date).copied() else {
            return Err(ActionError::not_allowed("That day is outside the program calendar"));
        };
        if !record.clickable {
            let reason = match record.status {
                DayStatus::Completed => "You have already answered this day's questions",
                DayStatus::Missed => "This day has passed and can no longer be attempted",
                DayStatus::Future => "This day is not open yet",
                DayStatus::Today => "This day cannot be opened",
            };
            return Err(ActionError::not_allowed(reason));
        }

        self.state.quiz = Some(QuizState::loading(date));
        self.state.screen = self.state.screen.on(Event::DayOpened(date));
        self.state.command_line.clear_message();
        Ok(())
    }

    /// Open the day under the calendar cursor
    pub fn open_selected_day(&mut self) -> Result<(), ActionError> {
        let Some(date) = self.state.selected_day().map(|d| d.date) else {
            return Err(ActionError::not_allowed("No days to show yet"));
        };
        self.open_day(date)
    }

    /// Fetch the questions for the open day
    pub async fn load_questions(&mut self) -> Result<(), ActionError> {
        let Some(date) = self.state.quiz.as_ref().map(|q| q.date) else {
            return Err(ActionError::not_allowed("No day is open"));
        };
        if let Some(quiz) = self.state.quiz.as_mut() {
            quiz.loading = true;
            quiz.error = None;
        }

        let result = self.gateway.questions(date).await;
        let Some(state) = self.state.quiz.as_mut() else {
            return Ok(());
        };
        match result {
            Ok(quiz) if quiz.questions.is_empty() => {
                state.fail(QuizError::NoQuestions.to_string());
                Err(QuizError::NoQuestions.into())
            }
            Ok(quiz) => {
                tracing::debug!("Loaded {} questions for {}", quiz.questions.len(), date);
                state.load(quiz);
                Ok(())
            }
            Err(e) => {
                state.fail(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Grade and submit the open quiz
    pub async fn submit_quiz(&mut self) -> Result<(), ActionError> {
        let user_id = self.require_session()?.user_id;
        let Some(state) = self.state.quiz.as_ref() else {
            return Err(ActionError::not_allowed("No quiz is open"));
        };
        if state.submitted || self.state.pending_completion.is_some() {
            return Err(QuizError::AlreadySubmitted.into());
        }
        let Some(quiz) = state.quiz.as_ref() else {
            return Err(ActionError::not_allowed("Questions are still loading"));
        };

        let date = state.date;
        let (request, grade) = build_submission(quiz, &state.answers, user_id, date)?;

        match self.gateway.submit(&request).await? {
            SubmitOutcome::AlreadyResponded { message } => {
                tracing::info!("Backend already holds a response for {}", date);
                self.state.command_line.set_error(message);
            }
            SubmitOutcome::Accepted { message } => {
                let all_correct = grade.all_correct();
                let (correct, total) = (grade.correct_count, grade.total);
                if let Some(state) = self.state.quiz.as_mut() {
                    state.mark_submitted(grade);
                }
                tracing::info!("Submitted {} with {}/{} correct", date, correct, total);

                if all_correct {
                    self.state.pending_completion = Some((date, Instant::now() + COMPLETION_DELAY));
                    self.notice(format!("{message} All answers correct!"));
                } else {
                    self.state.progress.record_attempt(date);
                    self.persist_progress()?;
                    self.notice(format!(
                        "{correct}/{total} correct. Review the answers, then press Esc for the calendar"
                    ));
                }
            }
        }
        Ok(())
    }

    /// Apply a due completion; returns true when the screen changed
    pub fn tick(&mut self, now: Instant) -> Result<bool, ActionError> {
        let Some((date, due)) = self.state.pending_completion else {
            return Ok(false);
        };
        if now < due {
            return Ok(false);
        }

        self.state.pending_completion = None;
        self.state.progress.record_completion(date);
        self.state.quiz = None;
        self.state.screen = self.state.screen.on(Event::DayCompleted(date));
        self.persist_progress()?;
        Ok(true)
    }

    /// Apply a pending completion now, before its delay has run out
    pub fn flush_pending(&mut self) -> Result<bool, ActionError> {
        match self.state.pending_completion {
            Some((_, due)) => self.tick(due),
            None => Ok(false),
        }
    }

    /// Return to the calendar from a quiz, completion or stats screen
    pub fn view_calendar(&mut self) -> Result<(), ActionError> {
        if self.state.pending_completion.is_some() {
            return Err(ActionError::not_allowed("Saving your progress..."));
        }
        let next = self.state.screen.on(Event::ViewCalendar);
        if next == self.state.screen {
            return Ok(());
        }
        self.state.quiz = None;
        self.state.screen = next;
        self.focus_today();
        self.state.command_line.clear_message();
        Ok(())
    }

    /// Pick another technology after completing a day
    pub fn change_technology(&mut self) -> Result<(), ActionError> {
        let next = self.state.screen.on(Event::ChangeTechnology);
        if next == self.state.screen {
            return Err(ActionError::not_allowed("Finish today's questions first"));
        }
        self.state.screen = next;
        Ok(())
    }

    pub fn open_stats(&mut self) -> Result<(), ActionError> {
        let next = self.state.screen.on(Event::OpenStats);
        if next == self.state.screen {
            return Err(ActionError::not_allowed("Statistics are available from the dashboard"));
        }
        self.state.screen = next;
        Ok(())
    }

    /// Log out and forget everything stored locally
    pub async fn logout(&mut self) -> Result<(), ActionError> {
        if let Some(session) = self.state.session.clone() {
            let now = self.clock.now();
            let request = LogoutRequest {
                user_id: session.user_id,
                user_date: now.format("%Y-%m-%d").to_string(),
                user_time: now.format("%H:%M:%S").to_string(),
                user_log_id: session.user_log_id,
            };
            if let Err(e) = self.gateway.logout(&request).await {
                tracing::warn!("Logout request failed, clearing local state anyway: {}", e);
            }
            tracing::info!("User {} logged out", session.user_id);
        }

        let cleared = self.store.clear();
        self.reset_state(Event::LoggedOut);
        cleared?;
        self.notice("You have been logged out");
        Ok(())
    }

    /// Wipe all persisted state without contacting the backend
    pub fn reset(&mut self) -> Result<(), ActionError> {
        let cleared = self.store.clear();
        self.reset_state(Event::Reset);
        cleared?;
        tracing::info!("Local state reset");
        self.notice("All progress has been reset");
        Ok(())
    }

    fn reset_state(&mut self, event: Event) {
        let history = std::mem::take(&mut self.state.command_line.history);
        let screen = self.state.screen.on(event);
        self.state = AppState { screen, ..Default::default() };
        self.state.command_line.history = history;
        self.recompute();
    }

    /// Stubbed email of the progress report, or of the open query
    pub fn email(&mut self) -> Result<(), ActionError> {
        let email = self.require_session()?.login_email.clone();
        let message = match (self.state.screen, &self.state.quiz) {
            (Screen::Query(date), Some(quiz)) => {
                let scenario =
                    quiz.quiz.as_ref().and_then(|q| q.scenario.clone()).unwrap_or_default();
                tracing::info!(%email, %date, %scenario, "Email query requested");
                format!("Query for {} sent to {}", date.format("%b %-d"), email)
            }
            _ => {
                if let Some(summary) = &self.state.summary {
                    tracing::info!(
                        %email,
                        completed = summary.completed_count,
                        streak = summary.streak,
                        "Email progress requested"
                    );
                }
                format!("Progress report sent to {email}")
            }
        };
        self.notice(message);
        Ok(())
    }

    /// Certificate for the current user, once a day has been completed
    pub fn certificate(&self) -> Option<Certificate> {
        Certificate::new(self.state.profile.as_ref()?, &self.state.progress)
    }

    /// Text for sharing the certificate
    pub fn share_text(&self) -> Result<String, ActionError> {
        self.certificate()
            .map(|c| c.share_text())
            .ok_or_else(|| ActionError::not_allowed("No certificate yet"))
    }

    /// Write the certificate into `dir`
    pub fn download_certificate(&mut self, dir: &Path) -> Result<PathBuf, ActionError> {
        if self.state.screen != Screen::Certificate {
            return Err(ActionError::not_allowed("The certificate has not been earned yet"));
        }
        let certificate =
            self.certificate().ok_or_else(|| ActionError::not_allowed("No certificate yet"))?;
        let path = certificate.write_to(dir)?;
        self.notice(format!("Certificate saved to {}", path.display()));
        Ok(path)
    }
}

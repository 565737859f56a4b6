//! End-to-end user flows through the controller with the in-process backend

use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use haq::Config;
use haq::app::controller::{Clock, Controller};
use haq::app::error::ActionError;
use haq::app::router::Screen;
use haq::app::state::{FormMode, TechOption, TextField};
use haq::calendar::DayStatus;
use haq::config::profile::{Technology, Track, UserProfile};
use haq::config::progress::{ProgressSets, save_signup_date};
use haq::config::session::UserSession;
use haq::config::storage::{LocalStore, keys};
use haq::gateway::{DummyGateway, GatewayError};
use haq::quiz::{DailyQuiz, Difficulty, Question, QuizError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const EMAIL: &str = "ada@example.com";
const PASSWORD: &str = "secret1";

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}

fn at(day: u32) -> Clock {
    Clock::Fixed(NaiveDateTime::new(d(day), NaiveTime::from_hms_opt(10, 0, 0).unwrap()))
}

fn store_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("storage.json")
}

fn open_store(dir: &TempDir) -> LocalStore {
    LocalStore::open(store_path(dir)).unwrap()
}

/// Two questions; the right answers are A then B
fn two_question_quiz() -> DailyQuiz {
    let question = |id: i64, text: &str, correct: usize| Question {
        mcq_id: id,
        question_id: 7,
        question: text.to_string(),
        options: vec!["Alpha".into(), "Beta".into(), "Gamma".into()],
        correct_answer: correct,
        correct_option: ["Alpha", "Beta", "Gamma"][correct].to_string(),
    };
    DailyQuiz {
        scenario: Some("Readmissions in the cardiology ward".into()),
        difficulty: Difficulty::Medium,
        questions: vec![question(701, "First?", 0), question(702, "Second?", 1)],
    }
}

fn gateway() -> DummyGateway {
    DummyGateway::new()
        .with_user(EMAIL, PASSWORD, "Ada Lovelace", Track::Da, d(1))
        .with_quiz(two_question_quiz())
}

fn controller(gateway: DummyGateway, dir: &TempDir, clock: Clock) -> Controller<DummyGateway> {
    Controller::new(gateway, open_store(dir), Config::default(), clock)
}

/// Persist a logged-in user with a chosen technology
fn seed_signed_in(path: &Path, completed: &[NaiveDate]) {
    let mut store = LocalStore::open(path).unwrap();
    UserSession {
        user_id: 1,
        login_email: EMAIL.to_string(),
        login_date: d(1),
        login_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        user_log_id: Some(1),
    }
    .save(&mut store)
    .unwrap();

    let mut profile = UserProfile::new("Ada Lovelace", Track::Da, "DA-01");
    profile.technology = Some(Technology::Sql);
    profile.save(&mut store).unwrap();
    save_signup_date(&mut store, d(1)).unwrap();

    let mut progress = ProgressSets::default();
    for &date in completed {
        progress.record_completion(date);
    }
    progress.save(&mut store).unwrap();
}

async fn log_in(app: &mut Controller<DummyGateway>) {
    app.state.login.email = TextField::with_value(EMAIL);
    app.state.login.password = TextField::with_value(PASSWORD);
    app.login().await.unwrap();
}

async fn open_today(app: &mut Controller<DummyGateway>) {
    let today = app.today();
    app.open_day(today).unwrap();
    app.load_questions().await.unwrap();
}

fn answer(app: &mut Controller<DummyGateway>, choices: &[usize]) {
    let quiz = app.state.quiz.as_mut().unwrap();
    for (question, &option) in choices.iter().enumerate() {
        assert!(quiz.choose(question, option));
    }
}

#[tokio::test]
async fn login_leads_to_technology_then_dashboard() {
    let dir = TempDir::new().unwrap();
    let mut app = controller(gateway(), &dir, at(5));
    assert_eq!(app.state.screen, Screen::Login);

    log_in(&mut app).await;
    assert_eq!(app.state.screen, Screen::TechSelection);
    assert_eq!(app.state.signup_date, Some(d(1)));
    assert_eq!(app.gateway().calls(), vec!["login", "attempted_days"]);
    assert!(app.store().get_item(keys::SESSION).is_some());

    let err = app.choose_technology(TechOption::ComingSoon("Statistics")).unwrap_err();
    assert!(matches!(err, ActionError::NotAllowed(_)));
    assert_eq!(app.state.screen, Screen::TechSelection);

    app.choose_technology(TechOption::Available(Technology::Sql)).unwrap();
    assert_eq!(app.state.screen, Screen::Dashboard);

    // A restart lands straight on the dashboard
    drop(app);
    let app = controller(gateway(), &dir, at(5));
    assert_eq!(app.state.screen, Screen::Dashboard);
}

#[tokio::test]
async fn wrong_password_stays_on_login() {
    let dir = TempDir::new().unwrap();
    let mut app = controller(gateway(), &dir, at(5));
    app.state.login.email = TextField::with_value(EMAIL);
    app.state.login.password = TextField::with_value("wrong-password");

    let err = app.login().await.unwrap_err();
    assert!(matches!(err, ActionError::Gateway(GatewayError::Rejected(_))));
    assert_eq!(app.state.screen, Screen::Login);
    assert!(app.store().is_empty());
}

#[tokio::test]
async fn calendar_reflects_remote_attempts() {
    let dir = TempDir::new().unwrap();
    let gateway = gateway().with_response(1, d(1)).with_response(1, d(2));
    let mut app = controller(gateway, &dir, at(5));
    log_in(&mut app).await;

    let statuses: Vec<DayStatus> = app.state.days.iter().map(|r| r.status).collect();
    assert_eq!(app.state.days.len(), 12);
    assert_eq!(&statuses[..5], &[
        DayStatus::Completed,
        DayStatus::Completed,
        DayStatus::Missed,
        DayStatus::Missed,
        DayStatus::Today,
    ]);
    assert!(statuses[5..].iter().all(|s| *s == DayStatus::Future));
    assert_eq!(app.state.progress.missed, vec![d(3), d(4)]);
    assert_eq!(app.state.selected_day().map(|r| r.date), Some(d(5)));
}

#[tokio::test]
async fn only_today_can_be_opened() {
    let dir = TempDir::new().unwrap();
    seed_signed_in(&store_path(&dir), &[d(1)]);
    let mut app = controller(gateway(), &dir, at(5));
    assert_eq!(app.state.screen, Screen::Dashboard);

    for day in [d(1), d(3), d(6)] {
        let err = app.open_day(day).unwrap_err();
        assert!(matches!(err, ActionError::NotAllowed(_)), "{day} should be refused");
    }
    assert_eq!(app.state.screen, Screen::Dashboard);

    app.open_day(d(5)).unwrap();
    assert_eq!(app.state.screen, Screen::Query(d(5)));
    assert!(app.state.quiz.as_ref().unwrap().loading);
}

#[tokio::test]
async fn incomplete_answers_are_not_submitted() {
    let dir = TempDir::new().unwrap();
    seed_signed_in(&store_path(&dir), &[]);
    let mut app = controller(gateway(), &dir, at(5));
    open_today(&mut app).await;
    answer(&mut app, &[0]);

    let err = app.submit_quiz().await.unwrap_err();
    assert!(matches!(err, ActionError::Quiz(QuizError::IncompleteAnswers { unanswered: 1 })));
    assert!(!app.gateway().calls().contains(&"submit"));
    assert_eq!(app.state.screen, Screen::Query(d(5)));
}

#[tokio::test]
async fn perfect_submission_completes_the_day_after_a_delay() {
    let dir = TempDir::new().unwrap();
    seed_signed_in(&store_path(&dir), &[d(4)]);
    let mut app = controller(gateway(), &dir, at(5));
    open_today(&mut app).await;
    answer(&mut app, &[0, 1]);

    app.submit_quiz().await.unwrap();
    assert!(app.state.quiz.as_ref().unwrap().submitted);
    assert!(app.state.pending_completion.is_some());
    assert_eq!(app.state.screen, Screen::Query(d(5)));
    assert!(matches!(app.view_calendar(), Err(ActionError::NotAllowed(_))));
    assert!(matches!(
        app.submit_quiz().await,
        Err(ActionError::Quiz(QuizError::AlreadySubmitted))
    ));

    assert!(!app.tick(Instant::now()).unwrap());
    assert!(app.tick(Instant::now() + Duration::from_secs(3)).unwrap());
    assert_eq!(app.state.screen, Screen::Completion(d(5)));
    assert!(app.state.quiz.is_none());

    let summary = app.state.summary.as_ref().unwrap();
    assert_eq!(summary.completed_count, 2);
    assert_eq!(summary.streak, 2);

    let stored = ProgressSets::load(&open_store(&dir));
    assert!(stored.is_completed(d(5)));
    assert!(stored.attempted.contains(&d(5)));

    app.view_calendar().unwrap();
    assert_eq!(app.state.screen, Screen::Dashboard);
    let today = app.state.days.iter().find(|r| r.date == d(5)).unwrap();
    assert_eq!(today.status, DayStatus::Completed);
    assert!(!today.clickable);
}

#[tokio::test]
async fn quitting_during_the_delay_keeps_the_completion() {
    let dir = TempDir::new().unwrap();
    seed_signed_in(&store_path(&dir), &[]);
    let mut app = controller(gateway(), &dir, at(5));
    open_today(&mut app).await;
    answer(&mut app, &[0, 1]);
    app.submit_quiz().await.unwrap();
    assert!(app.state.pending_completion.is_some());

    assert!(app.flush_pending().unwrap());
    assert!(app.state.pending_completion.is_none());
    assert!(!app.flush_pending().unwrap());
    drop(app);

    let app = controller(gateway(), &dir, at(5));
    assert!(app.state.progress.is_completed(d(5)));
    let today = app.state.days.iter().find(|r| r.date == d(5)).unwrap();
    assert_eq!(today.status, DayStatus::Completed);
}

#[tokio::test]
async fn fifteen_completions_out_of_twenty_five_attempts_stay_on_dashboard() {
    let dir = TempDir::new().unwrap();
    let completed: Vec<NaiveDate> = (1..=15).map(d).collect();
    seed_signed_in(&store_path(&dir), &completed);
    {
        let mut store = open_store(&dir);
        let mut progress = ProgressSets::load(&store);
        for day in 16..=25 {
            progress.record_attempt(d(day));
        }
        progress.save(&mut store).unwrap();
    }

    let app = controller(gateway(), &dir, at(26));
    let summary = app.state.summary.as_ref().unwrap();
    assert_eq!(summary.completed_count, 15);
    assert_eq!(app.state.progress.attempted.len(), 25);
    assert_eq!(app.state.screen, Screen::Dashboard);
}

#[tokio::test]
async fn partial_submission_records_an_attempt() {
    let dir = TempDir::new().unwrap();
    seed_signed_in(&store_path(&dir), &[]);
    let mut app = controller(gateway(), &dir, at(5));
    open_today(&mut app).await;
    answer(&mut app, &[0, 2]);

    app.submit_quiz().await.unwrap();
    let quiz = app.state.quiz.as_ref().unwrap();
    assert!(quiz.submitted);
    assert_eq!(quiz.score(), (1, 2));
    assert!(app.state.pending_completion.is_none());
    assert_eq!(app.state.screen, Screen::Query(d(5)));

    assert!(app.state.progress.attempted.contains(&d(5)));
    assert!(!app.state.progress.is_completed(d(5)));
    assert!(!app.command_line_is_error());

    app.view_calendar().unwrap();
    assert_eq!(app.state.screen, Screen::Dashboard);
}

#[tokio::test]
async fn already_responded_is_reported_without_recording() {
    let dir = TempDir::new().unwrap();
    seed_signed_in(&store_path(&dir), &[]);
    let gateway = gateway().with_response(1, d(5));
    let mut app = controller(gateway, &dir, at(5));
    open_today(&mut app).await;
    answer(&mut app, &[0, 1]);

    app.submit_quiz().await.unwrap();
    assert!(app.command_line_is_error());
    assert_eq!(
        app.state.command_line.message.as_deref(),
        Some("Already responded for the day!!")
    );
    assert!(!app.state.quiz.as_ref().unwrap().submitted);
    assert!(app.state.pending_completion.is_none());
    assert!(!app.state.progress.attempted.contains(&d(5)));
}

#[tokio::test]
async fn question_failure_can_be_retried() {
    let dir = TempDir::new().unwrap();
    seed_signed_in(&store_path(&dir), &[]);
    let mut app = controller(gateway(), &dir, at(5));
    app.open_day(d(5)).unwrap();

    app.gateway().fail_next(GatewayError::Timeout { seconds: 30 });
    assert!(matches!(app.load_questions().await, Err(ActionError::Gateway(_))));
    let quiz = app.state.quiz.as_ref().unwrap();
    assert!(!quiz.loading);
    assert!(quiz.error.is_some());

    app.load_questions().await.unwrap();
    let quiz = app.state.quiz.as_ref().unwrap();
    assert!(quiz.error.is_none());
    assert_eq!(quiz.questions().len(), 2);
}

#[tokio::test]
async fn final_day_routes_to_certificate() {
    let dir = TempDir::new().unwrap();
    let earlier: Vec<NaiveDate> = (1..=14).map(d).collect();
    seed_signed_in(&store_path(&dir), &earlier);
    let mut app = controller(gateway(), &dir, at(15));
    assert_eq!(app.state.screen, Screen::Dashboard);

    open_today(&mut app).await;
    answer(&mut app, &[0, 1]);
    app.submit_quiz().await.unwrap();
    app.tick(Instant::now() + Duration::from_secs(3)).unwrap();

    assert_eq!(app.state.screen, Screen::Certificate);
    let certificate = app.certificate().unwrap();
    assert_eq!(certificate.name, "Ada Lovelace");
    assert_eq!(certificate.completed_on, d(15));

    let out = TempDir::new().unwrap();
    let path = app.download_certificate(out.path()).unwrap();
    let text = std::fs::read_to_string(path).unwrap();
    assert!(text.contains("Ada Lovelace"));
}

#[tokio::test]
async fn earned_certificate_is_shown_on_start() {
    let dir = TempDir::new().unwrap();
    let all: Vec<NaiveDate> = (1..=15).map(d).collect();
    seed_signed_in(&store_path(&dir), &all);
    let mut app = controller(gateway(), &dir, at(20));

    assert_eq!(app.state.screen, Screen::Certificate);
    assert!(matches!(app.open_stats(), Err(ActionError::NotAllowed(_))));
    assert!(app.share_text().unwrap().contains("Ada Lovelace"));

    app.reset().unwrap();
    assert_eq!(app.state.screen, Screen::Login);
    assert!(open_store(&dir).is_empty());
}

#[tokio::test]
async fn logout_clears_local_state_even_if_the_call_fails() {
    let dir = TempDir::new().unwrap();
    let mut app = controller(gateway(), &dir, at(5));
    log_in(&mut app).await;
    app.choose_technology(TechOption::Available(Technology::Python)).unwrap();

    app.gateway().fail_next(GatewayError::Unreachable { url: "http://localhost".into() });
    app.logout().await.unwrap();

    assert_eq!(app.state.screen, Screen::Login);
    assert!(app.state.session.is_none());
    assert!(app.state.profile.is_none());
    assert!(app.store().is_empty());
    assert!(open_store(&dir).is_empty());
    assert_eq!(app.gateway().calls().last(), Some(&"logout"));
}

#[tokio::test]
async fn sign_up_validates_before_calling_out() {
    let dir = TempDir::new().unwrap();
    let mut app = controller(DummyGateway::new(), &dir, at(5));
    app.state.login.toggle_mode();
    assert_eq!(app.state.login.mode, FormMode::SignUp);

    app.state.login.email = TextField::with_value("grace@example.com");
    app.state.login.password = TextField::with_value("hopper1");
    let err = app.sign_up().await.unwrap_err();
    assert_eq!(err.to_string(), "Please fill in all fields");
    assert!(app.gateway().calls().is_empty());

    app.state.login.name = TextField::with_value("Grace Hopper");
    app.state.login.batch_code = TextField::with_value("SDET-07");
    app.state.login.track = Track::Sdet;
    app.state.login.email = TextField::with_value("grace@example");
    assert_eq!(app.sign_up().await.unwrap_err().to_string(), "Please enter a valid email address");

    app.state.login.email = TextField::with_value("grace@example.com");
    app.state.login.password = TextField::with_value("hopper1");
    app.sign_up().await.unwrap();

    assert_eq!(app.state.screen, Screen::Login);
    assert_eq!(app.state.login.mode, FormMode::Login);
    assert_eq!(app.state.login.email.value, "grace@example.com");
    assert!(app.state.command_line.message.as_deref().unwrap().contains("Please log in"));
    let profile = UserProfile::load(app.store()).unwrap();
    assert_eq!(profile.name, "Grace Hopper");
    assert_eq!(profile.track, Track::Sdet);

    app.state.login.password = TextField::with_value("hopper1");
    app.login().await.unwrap();
    assert_eq!(app.state.screen, Screen::TechSelection);
}

#[tokio::test]
async fn expired_session_returns_to_login() {
    let dir = TempDir::new().unwrap();
    seed_signed_in(&store_path(&dir), &[d(1)]);
    let config = Config { session_max_age_hours: Some(24), ..Config::default() };
    let app = Controller::new(gateway(), open_store(&dir), config, at(5));

    assert_eq!(app.state.screen, Screen::Login);
    assert!(app.state.session.is_none());
    assert!(app.store().get_item(keys::SESSION).is_none());
    // Progress survives; only the session is dropped
    assert!(app.state.progress.is_completed(d(1)));
}

trait CommandLineExt {
    fn command_line_is_error(&self) -> bool;
}

impl CommandLineExt for Controller<DummyGateway> {
    fn command_line_is_error(&self) -> bool {
        self.state.command_line.is_error && self.state.command_line.message.is_some()
    }
}

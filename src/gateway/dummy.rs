//! In-process backend with a built-in question bank
//!
//! Used by `--offline` and by the integration tests. Accounts and responses
//! live in memory only, so an offline session starts from whatever the local
//! store remembers.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use chrono::{Datelike, Local, NaiveDate};

use super::Gateway;
use super::error::GatewayError;
use super::models::{
    AttemptedDays, LoginGrant, LoginRequest, LogoutRequest, RemoteUser, SignUpRequest,
    SubmitOutcome, SubmitRequest,
};
use crate::config::profile::Track;
use crate::quiz::{DailyQuiz, Difficulty, Question};

#[derive(Debug, Clone)]
struct Account {
    password: String,
    user: RemoteUser,
    signup_date: NaiveDate,
}

#[derive(Debug, Default)]
struct Inner {
    /// Accounts by lower-cased email
    accounts: BTreeMap<String, Account>,
    /// Days with a stored response, per user
    responses: BTreeMap<i64, BTreeSet<NaiveDate>>,
    next_user_id: i64,
    next_log_id: i64,
    /// Replaces the question bank when set
    quiz: Option<DailyQuiz>,
    /// Returned by the next call instead of its normal result
    failure: Option<GatewayError>,
    calls: Vec<&'static str>,
}

/// Gateway that never leaves the process
#[derive(Debug)]
pub struct DummyGateway {
    inner: Mutex<Inner>,
}

impl Default for DummyGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyGateway {
    pub fn new() -> Self {
        Self { inner: Mutex::new(Inner { next_user_id: 1, next_log_id: 1, ..Default::default() }) }
    }

    /// Seed an account
    pub fn with_user(
        self,
        email: &str,
        password: &str,
        name: &str,
        track: Track,
        signup_date: NaiveDate,
    ) -> Self {
        {
            let mut inner = self.lock();
            let user_id = inner.next_user_id;
            inner.next_user_id += 1;
            inner.accounts.insert(
                email.trim().to_lowercase(),
                Account {
                    password: password.to_string(),
                    user: RemoteUser {
                        user_id,
                        name: name.to_string(),
                        track: track.code().to_string(),
                        batch_code: format!("{}-01", track.code()),
                    },
                    signup_date,
                },
            );
        }
        self
    }

    /// Serve this quiz for every day
    pub fn with_quiz(self, quiz: DailyQuiz) -> Self {
        self.lock().quiz = Some(quiz);
        self
    }

    /// Seed a stored response
    pub fn with_response(self, user_id: i64, date: NaiveDate) -> Self {
        self.lock().responses.entry(user_id).or_default().insert(date);
        self
    }

    /// Make the next call fail with `error`
    pub fn fail_next(&self, error: GatewayError) {
        self.lock().failure = Some(error);
    }

    /// Names of the operations called so far, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Log the call and return an injected failure, if any
    fn enter(&self, name: &'static str) -> Result<MutexGuard<'_, Inner>, GatewayError> {
        let mut inner = self.lock();
        inner.calls.push(name);
        match inner.failure.take() {
            Some(error) => Err(error),
            None => Ok(inner),
        }
    }
}

impl Gateway for DummyGateway {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<String, GatewayError> {
        let mut inner = self.enter("sign_up")?;
        let email = request.email.trim().to_lowercase();
        if inner.accounts.contains_key(&email) {
            return Err(GatewayError::Rejected("Email already registered".to_string()));
        }

        let user_id = inner.next_user_id;
        inner.next_user_id += 1;
        inner.accounts.insert(
            email,
            Account {
                password: request.password.clone(),
                user: RemoteUser {
                    user_id,
                    name: request.name.clone(),
                    track: request.track.code().to_string(),
                    batch_code: request.batch_code.clone(),
                },
                signup_date: Local::now().date_naive(),
            },
        );
        tracing::debug!("Offline account {} created", user_id);
        Ok("Account created successfully".to_string())
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginGrant, GatewayError> {
        let mut inner = self.enter("login")?;
        let user = match inner.accounts.get(&request.email.trim().to_lowercase()) {
            Some(account) if account.password == request.password => account.user.clone(),
            _ => return Err(GatewayError::Rejected("Invalid email or password".to_string())),
        };

        let user_log_id = inner.next_log_id;
        inner.next_log_id += 1;
        Ok(LoginGrant { user, user_log_id: Some(user_log_id) })
    }

    async fn logout(&self, _request: &LogoutRequest) -> Result<(), GatewayError> {
        self.enter("logout")?;
        Ok(())
    }

    async fn attempted_days(&self, user_id: i64) -> Result<AttemptedDays, GatewayError> {
        let inner = self.enter("attempted_days")?;
        let signup_date =
            inner.accounts.values().find(|a| a.user.user_id == user_id).map(|a| a.signup_date);
        let attempted_days = inner
            .responses
            .get(&user_id)
            .map(|days| days.iter().copied().collect())
            .unwrap_or_default();
        Ok(AttemptedDays { signup_date, attempted_days })
    }

    async fn questions(&self, date: NaiveDate) -> Result<DailyQuiz, GatewayError> {
        let inner = self.enter("questions")?;
        Ok(match &inner.quiz {
            Some(quiz) => quiz.clone(),
            None => question_bank(date),
        })
    }

    async fn submit(&self, request: &SubmitRequest) -> Result<SubmitOutcome, GatewayError> {
        let mut inner = self.enter("submit")?;
        let summary = &request.summary;
        let date = NaiveDate::parse_from_str(&summary.submitted_date, "%Y-%m-%d")
            .map_err(|e| GatewayError::UnexpectedResponse(e.to_string()))?;

        let days = inner.responses.entry(summary.user_id).or_default();
        if !days.insert(date) {
            return Ok(SubmitOutcome::AlreadyResponded {
                message: "Already responded for the day!!".to_string(),
            });
        }
        Ok(SubmitOutcome::Accepted { message: "Responses submitted successfully!".to_string() })
    }
}

struct BankEntry {
    scenario: &'static str,
    difficulty: Difficulty,
    questions: &'static [(&'static str, [&'static str; 4], usize)],
}

const BANK: &[BankEntry] = &[
    BankEntry {
        scenario: "List every patient admitted to the ICU in the last 30 days.",
        difficulty: Difficulty::Easy,
        questions: &[
            (
                "Which clause limits rows to ICU admissions?",
                ["WHERE ward = 'ICU'", "GROUP BY ward", "ORDER BY ward", "HAVING ward = 'ICU'"],
                0,
            ),
            (
                "Which function returns today's date in most SQL dialects?",
                ["NOW_DATE()", "CURRENT_DATE", "TODAY()", "SYSDAY"],
                1,
            ),
            (
                "How do you avoid listing a patient twice?",
                ["UNIQUE *", "SELECT ONCE", "SELECT DISTINCT", "LIMIT 1"],
                2,
            ),
        ],
    },
    BankEntry {
        scenario: "Count readmissions within 30 days of discharge per department.",
        difficulty: Difficulty::Medium,
        questions: &[
            (
                "Which join pairs an admission with the same patient's later admission?",
                ["CROSS JOIN", "Self join on patient_id", "NATURAL JOIN", "UNION"],
                1,
            ),
            (
                "Which clause filters on an aggregate such as COUNT(*) > 5?",
                ["WHERE", "ON", "HAVING", "FILTER BY"],
                2,
            ),
            (
                "What does COUNT(DISTINCT patient_id) return?",
                [
                    "Number of rows",
                    "Number of different patients",
                    "Largest patient id",
                    "Number of NULL ids",
                ],
                1,
            ),
        ],
    },
    BankEntry {
        scenario: "Rank physicians by average length of stay of their patients.",
        difficulty: Difficulty::Hard,
        questions: &[
            (
                "Which window function assigns ranks with gaps after ties?",
                ["ROW_NUMBER()", "RANK()", "DENSE_RANK()", "NTILE()"],
                1,
            ),
            (
                "Length of stay is best computed from which columns?",
                [
                    "admit_date and discharge_date",
                    "birth_date and admit_date",
                    "visit_id and bed_id",
                    "ward and room",
                ],
                0,
            ),
            (
                "Where must a window function's PARTITION BY appear?",
                ["In WHERE", "Inside OVER (...)", "After ORDER BY", "In GROUP BY"],
                1,
            ),
        ],
    },
    BankEntry {
        scenario: "Find lab results outside the normal range for diabetic patients.",
        difficulty: Difficulty::Medium,
        questions: &[
            (
                "Which operator tests a value against a range?",
                ["IN", "LIKE", "BETWEEN", "EXISTS"],
                2,
            ),
            (
                "Which predicate keeps patients that have a diabetes diagnosis row?",
                ["EXISTS (subquery)", "IS NULL", "ALL (subquery)", "NOT LIKE"],
                0,
            ),
            (
                "A missing lab value is stored as NULL. Which test finds it?",
                ["= NULL", "IS NULL", "== ''", "NULLIF"],
                1,
            ),
        ],
    },
];

/// Pick the bank entry for a day
fn question_bank(date: NaiveDate) -> DailyQuiz {
    let index = date.num_days_from_ce().rem_euclid(BANK.len() as i32) as usize;
    let entry = &BANK[index];
    let question_id = index as i64 + 1;

    let questions = entry
        .questions
        .iter()
        .enumerate()
        .map(|(n, (text, options, correct))| Question {
            mcq_id: question_id * 100 + n as i64 + 1,
            question_id,
            question: text.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: *correct,
            correct_option: options[*correct].to_string(),
        })
        .collect();

    DailyQuiz { scenario: Some(entry.scenario.to_string()), difficulty: entry.difficulty, questions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::build_submission;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn gateway() -> DummyGateway {
        DummyGateway::new().with_user("ada@example.com", "secret1", "Ada", Track::Da, day(1))
    }

    fn login_request(password: &str) -> LoginRequest {
        LoginRequest {
            email: "Ada@Example.com".into(),
            password: password.into(),
            user_date: "2025-01-05".into(),
            user_time: "09:00:00".into(),
        }
    }

    #[tokio::test]
    async fn login_checks_password() {
        let gateway = gateway();
        let grant = gateway.login(&login_request("secret1")).await.unwrap();
        assert_eq!(grant.user.name, "Ada");
        assert_eq!(grant.user_log_id, Some(1));

        let err = gateway.login(&login_request("nope")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Rejected(_)));
    }

    #[tokio::test]
    async fn duplicate_sign_up_is_rejected() {
        let gateway = gateway();
        let request = SignUpRequest {
            name: "Ada".into(),
            track: Track::Da,
            batch_code: "DA-01".into(),
            email: "ada@example.com".into(),
            password: "secret1".into(),
            timezone: "+00:00".into(),
            local_datetime: "2025-01-05 09:00:00".into(),
        };
        let err = gateway.sign_up(&request).await.unwrap_err();
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[tokio::test]
    async fn second_submission_for_a_day_fails() {
        let gateway = gateway();
        let quiz = question_bank(day(5));
        let answers: Vec<_> = quiz.questions.iter().map(|q| Some(q.correct_answer)).collect();
        let (request, _) = build_submission(&quiz, &answers, 1, day(5)).unwrap();

        assert!(matches!(gateway.submit(&request).await.unwrap(), SubmitOutcome::Accepted { .. }));
        assert!(matches!(
            gateway.submit(&request).await.unwrap(),
            SubmitOutcome::AlreadyResponded { .. }
        ));

        let days = gateway.attempted_days(1).await.unwrap();
        assert_eq!(days.signup_date, Some(day(1)));
        assert_eq!(days.attempted_days, vec![day(5)]);
    }

    #[tokio::test]
    async fn injected_failure_applies_once() {
        let gateway = gateway();
        gateway.fail_next(GatewayError::Timeout { seconds: 30 });
        assert!(gateway.questions(day(2)).await.is_err());
        assert!(gateway.questions(day(2)).await.is_ok());
        assert_eq!(gateway.calls(), vec!["questions", "questions"]);
    }

    #[test]
    fn bank_questions_are_well_formed() {
        for offset in 0..BANK.len() as u32 {
            let quiz = question_bank(day(1 + offset));
            assert_eq!(quiz.questions.len(), 3);
            for q in &quiz.questions {
                assert!(q.correct_answer < q.options.len());
                assert_eq!(q.options[q.correct_answer], q.correct_option);
            }
        }
    }
}

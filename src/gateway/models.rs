//! Request and response shapes for the auth service and workflow backend
//!
//! Workflow engines tend to answer with a list of items even for a single
//! result, so every response is passed through [`first_item`] before it is
//! decoded. Status fields are compared as strings because the backend sends
//! `"true"` and `"success"` rather than booleans.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::error::GatewayError;
use crate::config::profile::Track;
use crate::quiz::{DailyQuiz, Difficulty, Question};

/// Sign-up form as sent to the auth service
#[derive(Debug, Clone, Serialize)]
pub struct SignUpRequest {
    pub name: String,
    pub track: Track,
    pub batch_code: String,
    pub email: String,
    pub password: String,
    /// UTC offset of the client, e.g. `+05:30`
    pub timezone: String,
    /// Client wall-clock time, `yyyy-MM-dd HH:mm:ss`
    pub local_datetime: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpResponse {
    #[serde(default, deserialize_with = "truthy")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl SignUpResponse {
    pub fn into_result(self) -> Result<String, GatewayError> {
        if self.success {
            Ok(self.message.unwrap_or_else(|| "Account created".to_string()))
        } else {
            Err(GatewayError::Rejected(self.message.unwrap_or_else(|| "Sign up failed".to_string())))
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(rename = "userDate")]
    pub user_date: String,
    #[serde(rename = "userTime")]
    pub user_time: String,
}

/// User record returned on login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteUser {
    #[serde(deserialize_with = "lenient_id")]
    pub user_id: i64,
    pub name: String,
    pub track: String,
    #[serde(default)]
    pub batch_code: String,
}

impl RemoteUser {
    /// Track parsed from the wire code; unknown codes fall back to the default
    pub fn track(&self) -> Track {
        Track::parse(&self.track).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub user: Option<RemoteUser>,
    #[serde(default, deserialize_with = "lenient_opt_id")]
    pub user_log_id: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub user: RemoteUser,
    pub user_log_id: Option<i64>,
}

impl LoginResponse {
    pub fn into_grant(self) -> Result<LoginGrant, GatewayError> {
        match (self.status.as_deref(), self.user) {
            (Some("success"), Some(user)) => Ok(LoginGrant { user, user_log_id: self.user_log_id }),
            (Some("success"), None) => {
                Err(GatewayError::UnexpectedResponse("login succeeded without a user".to_string()))
            }
            _ => Err(GatewayError::Rejected(
                self.message.unwrap_or_else(|| "Invalid email or password".to_string()),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogoutRequest {
    pub user_id: i64,
    #[serde(rename = "userDate")]
    pub user_date: String,
    #[serde(rename = "userTime")]
    pub user_time: String,
    #[serde(rename = "userLogId")]
    pub user_log_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptedDaysRequest {
    pub user_id: i64,
}

/// Program start and the days the backend has responses for
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AttemptedDays {
    #[serde(default, deserialize_with = "lenient_opt_date")]
    pub signup_date: Option<NaiveDate>,
    #[serde(rename = "attemptedDays", default, deserialize_with = "lenient_dates")]
    pub attempted_days: Vec<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionsRequest {
    pub current_date: String,
}

#[derive(Debug, Clone, Deserialize)]
struct QueryInfo {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    difficulty_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct QuestionSet {
    #[serde(default)]
    query: Option<QueryInfo>,
    #[serde(default)]
    mcqs: Vec<Question>,
}

impl From<QuestionSet> for DailyQuiz {
    fn from(set: QuestionSet) -> Self {
        let (scenario, difficulty) = match set.query {
            Some(query) => (
                query.question,
                query.difficulty_level.as_deref().map(Difficulty::parse).unwrap_or_default(),
            ),
            None => (None, Difficulty::default()),
        };
        DailyQuiz { scenario, difficulty, questions: set.mcqs }
    }
}

/// Decode the questions for a day.
///
/// Accepts `[{query, mcqs}]`, `{query?, mcqs}` and a bare list of questions,
/// including a single question left over from [`first_item`].
pub fn parse_daily_quiz(body: Value) -> Result<DailyQuiz, GatewayError> {
    match body {
        Value::Array(items) if items.is_empty() => Ok(DailyQuiz::default()),
        Value::Array(mut items) if items[0].get("mcqs").is_some() => {
            let set: QuestionSet = serde_json::from_value(items.swap_remove(0))?;
            Ok(set.into())
        }
        Value::Array(items) if items[0].get("options").is_some() => {
            let questions: Vec<Question> = serde_json::from_value(Value::Array(items))?;
            Ok(DailyQuiz { questions, ..Default::default() })
        }
        Value::Object(map) if map.contains_key("mcqs") => {
            let set: QuestionSet = serde_json::from_value(Value::Object(map))?;
            Ok(set.into())
        }
        // a one-question bare list arrives here already unwrapped
        Value::Object(map) if map.contains_key("options") => {
            let question: Question = serde_json::from_value(Value::Object(map))?;
            Ok(DailyQuiz { questions: vec![question], ..Default::default() })
        }
        other => Err(GatewayError::UnexpectedResponse(summarize(&other))),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct McqResponse {
    pub mcq_id: i64,
    pub user_id: i64,
    /// Option letter, `A` for the first option
    pub selected_option: String,
    pub correct_flag: bool,
    pub answered: bool,
    pub respond_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionSummary {
    pub user_id: i64,
    pub question_id: i64,
    pub total_mcq: usize,
    pub total_correct: usize,
    pub total_avg_score: f64,
    pub question_weight: u8,
    pub weighted_score: f64,
    pub submitted_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest {
    pub responses: Vec<McqResponse>,
    pub summary: SubmissionSummary,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// What the backend said about a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted { message: String },
    /// A response for this day already exists
    AlreadyResponded { message: String },
}

impl SubmitResponse {
    pub fn into_outcome(self) -> Result<SubmitOutcome, GatewayError> {
        match self.status.as_deref() {
            Some("success") => Ok(SubmitOutcome::Accepted {
                message: self.message.unwrap_or_else(|| "Responses submitted successfully!".into()),
            }),
            Some("fail") => Ok(SubmitOutcome::AlreadyResponded {
                message: self.message.unwrap_or_else(|| "Already responded for the day!!".into()),
            }),
            other => Err(GatewayError::UnexpectedResponse(format!("submission status {:?}", other))),
        }
    }
}

/// Unwrap a single-item list response
pub fn first_item(body: Value) -> Value {
    match body {
        Value::Array(mut items) if items.len() == 1 => items.swap_remove(0),
        other => other,
    }
}

/// Short description of a body for error messages
fn summarize(body: &Value) -> String {
    let text = body.to_string();
    match text.char_indices().nth(120) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text,
    }
}

fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "success" | "1"),
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        _ => false,
    })
}

fn id_from_value<E: serde::de::Error>(value: Value) -> Result<Option<i64>, E> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_i64().map(Some).ok_or_else(|| E::custom("id is not an integer")),
        Value::String(s) => s.trim().parse().map(Some).map_err(E::custom),
        other => Err(E::custom(format!("unexpected id {}", other))),
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    id_from_value(Value::deserialize(deserializer)?)?
        .ok_or_else(|| serde::de::Error::custom("missing id"))
}

fn lenient_opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    id_from_value(Value::deserialize(deserializer)?)
}

/// Parse `yyyy-MM-dd`, ignoring any time part that follows
fn parse_date_prefix(s: &str) -> Option<NaiveDate> {
    let prefix = s.trim().get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

fn lenient_opt_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(s) => parse_date_prefix(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date {s:?}"))),
        None => Ok(None),
    }
}

fn lenient_dates<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<NaiveDate>, D::Error> {
    let raw = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    raw.iter()
        .map(|s| {
            parse_date_prefix(s).ok_or_else(|| serde::de::Error::custom(format!("invalid date {s:?}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn first_item_unwraps_single_lists() {
        assert_eq!(first_item(json!([{"status": "success"}])), json!({"status": "success"}));
        assert_eq!(first_item(json!({"status": "success"})), json!({"status": "success"}));
        assert_eq!(first_item(json!([1, 2])), json!([1, 2]));
    }

    #[test]
    fn sign_up_success_is_a_string() {
        let ok: SignUpResponse = serde_json::from_value(json!({"success": "true"})).unwrap();
        assert!(ok.into_result().is_ok());

        let dup: SignUpResponse =
            serde_json::from_value(json!({"success": "false", "message": "Email already registered"}))
                .unwrap();
        assert_eq!(dup.into_result().unwrap_err().to_string(), "Email already registered");
    }

    #[test]
    fn login_response_grants_user() {
        let body = json!({
            "status": "success",
            "user": {"user_id": "17", "name": "Ada", "track": "SDET", "batch_code": "SD1"},
            "user_log_id": 88
        });
        let grant = serde_json::from_value::<LoginResponse>(body).unwrap().into_grant().unwrap();
        assert_eq!(grant.user.user_id, 17);
        assert_eq!(grant.user.track(), Track::Sdet);
        assert_eq!(grant.user_log_id, Some(88));
    }

    #[test]
    fn login_failure_is_rejection() {
        let body = json!({"status": "error", "message": "Wrong password"});
        let err = serde_json::from_value::<LoginResponse>(body).unwrap().into_grant().unwrap_err();
        assert!(matches!(err, GatewayError::Rejected(m) if m == "Wrong password"));
    }

    #[test]
    fn login_request_uses_wire_names() {
        let req = LoginRequest {
            email: "a@b.c".into(),
            password: "secret".into(),
            user_date: "2025-01-05".into(),
            user_time: "09:00:00".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["userDate"], "2025-01-05");
        assert_eq!(json["userTime"], "09:00:00");
    }

    #[test]
    fn attempted_days_accept_timestamps() {
        let body = json!({
            "signup_date": "2025-01-01T00:00:00.000Z",
            "attemptedDays": ["2025-01-02", "2025-01-04T10:00:00Z"]
        });
        let days: AttemptedDays = serde_json::from_value(body).unwrap();
        assert_eq!(days.signup_date, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(days.attempted_days.len(), 2);
    }

    #[test]
    fn attempted_days_tolerate_null_list() {
        let days: AttemptedDays =
            serde_json::from_value(json!({"signup_date": "2025-01-01", "attemptedDays": null}))
                .unwrap();
        assert!(days.attempted_days.is_empty());
    }

    #[test]
    fn daily_quiz_from_query_sets() {
        let body = json!([{
            "query": {"question": "Count ICU admissions", "difficulty_level": "hard"},
            "mcqs": [{
                "mcq_id": 1, "question_id": 5, "question": "Which clause?",
                "options": ["WHERE", "HAVING"], "correctAnswer": 1, "correctOption": "HAVING"
            }]
        }]);
        let quiz = parse_daily_quiz(body).unwrap();
        assert_eq!(quiz.difficulty, Difficulty::Hard);
        assert_eq!(quiz.scenario.as_deref(), Some("Count ICU admissions"));
        assert_eq!(quiz.question_id(), 5);
    }

    #[test]
    fn daily_quiz_from_flat_list() {
        let body = json!([
            {"mcq_id": 1, "question": "Q1", "options": ["a", "b"], "correctAnswer": 0},
            {"mcq_id": 2, "question": "Q2", "options": ["a", "b"], "correctAnswer": 1}
        ]);
        let quiz = parse_daily_quiz(body).unwrap();
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.difficulty, Difficulty::Easy);
    }

    #[test]
    fn daily_quiz_from_single_question_list() {
        let body = first_item(json!([
            {"mcq_id": 1, "question": "Q1", "options": ["a", "b"], "correctAnswer": 0}
        ]));
        let quiz = parse_daily_quiz(body).unwrap();
        assert_eq!(quiz.questions.len(), 1);
        assert_eq!(quiz.questions[0].question, "Q1");
        assert_eq!(quiz.scenario, None);
    }

    #[test]
    fn daily_quiz_rejects_unknown_shape() {
        let err = parse_daily_quiz(json!({"hello": "world"})).unwrap_err();
        assert!(matches!(err, GatewayError::UnexpectedResponse(_)));
    }

    #[test]
    fn submit_outcomes() {
        let ok: SubmitResponse = serde_json::from_value(json!({"status": "success"})).unwrap();
        assert!(matches!(ok.into_outcome().unwrap(), SubmitOutcome::Accepted { .. }));

        let dup: SubmitResponse =
            serde_json::from_value(json!({"status": "fail", "message": "Already responded"})).unwrap();
        assert_eq!(
            dup.into_outcome().unwrap(),
            SubmitOutcome::AlreadyResponded { message: "Already responded".into() }
        );

        let odd: SubmitResponse = serde_json::from_value(json!({"ok": true})).unwrap();
        assert!(matches!(odd.into_outcome(), Err(GatewayError::UnexpectedResponse(_))));
    }
}

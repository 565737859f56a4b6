//! Daily quiz: questions, answer state and submission grading
//!
//! Grading here is advisory. It drives the instant feedback on screen and the
//! summary sent with the submission, but the backend decides whether the
//! submission is accepted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gateway::models::{McqResponse, SubmissionSummary, SubmitRequest};

/// Difficulty of a daily query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Score multiplier
    pub fn weight(&self) -> u8 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }

    /// Parse a backend difficulty level; unknown values fall back to easy
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "medium" | "2" => Self::Medium,
            "hard" | "3" => Self::Hard,
            _ => Self::Easy,
        }
    }
}

/// A single multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub mcq_id: i64,
    #[serde(default)]
    pub question_id: i64,
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`
    #[serde(rename = "correctAnswer")]
    pub correct_answer: usize,
    #[serde(rename = "correctOption", default)]
    pub correct_option: String,
}

/// The questions served for one day
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyQuiz {
    /// SQL/clinical scenario the questions are about
    pub scenario: Option<String>,
    pub difficulty: Difficulty,
    pub questions: Vec<Question>,
}

impl DailyQuiz {
    /// Identifier of the daily query, taken from its questions
    pub fn question_id(&self) -> i64 {
        self.questions.first().map(|q| q.question_id).unwrap_or_default()
    }
}

/// Errors raised before a submission leaves the client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("Please answer all questions! ({unanswered} left)")]
    IncompleteAnswers { unanswered: usize },

    #[error("No questions available for this day")]
    NoQuestions,

    #[error("Responses for this day were already submitted")]
    AlreadySubmitted,
}

/// Local grading of a complete answer sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    /// Per-question correctness
    pub results: Vec<bool>,
    pub correct_count: usize,
    pub total: usize,
    /// correct / total, two decimals
    pub average_score: f64,
    /// correct / total * difficulty weight, two decimals
    pub weighted_score: f64,
}

impl Grade {
    pub fn all_correct(&self) -> bool {
        self.total > 0 && self.correct_count == self.total
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Daily weighted score
pub fn weighted_score(correct: usize, total: usize, difficulty: Difficulty) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(correct as f64 / total as f64 * f64::from(difficulty.weight()))
}

/// Letter shown for an option index (0 -> 'A')
pub fn option_letter(index: usize) -> char {
    char::from(b'A' + (index % 26) as u8)
}

/// Grade an answer sheet; every question must be answered
pub fn grade(quiz: &DailyQuiz, answers: &[Option<usize>]) -> Result<Grade, QuizError> {
    if quiz.questions.is_empty() {
        return Err(QuizError::NoQuestions);
    }

    let unanswered = quiz.questions.len().saturating_sub(answers.len())
        + answers.iter().take(quiz.questions.len()).filter(|a| a.is_none()).count();
    if unanswered > 0 {
        return Err(QuizError::IncompleteAnswers { unanswered });
    }

    let results: Vec<bool> = quiz
        .questions
        .iter()
        .zip(answers)
        .map(|(q, a)| *a == Some(q.correct_answer))
        .collect();
    let correct_count = results.iter().filter(|r| **r).count();
    let total = results.len();

    Ok(Grade {
        results,
        correct_count,
        total,
        average_score: round2(correct_count as f64 / total as f64),
        weighted_score: weighted_score(correct_count, total, quiz.difficulty),
    })
}

/// Build the submission payload for a graded answer sheet
pub fn build_submission(
    quiz: &DailyQuiz,
    answers: &[Option<usize>],
    user_id: i64,
    date: NaiveDate,
) -> Result<(SubmitRequest, Grade), QuizError> {
    let grade = grade(quiz, answers)?;
    let date = date.format("%Y-%m-%d").to_string();

    let responses = quiz
        .questions
        .iter()
        .zip(answers.iter().flatten())
        .zip(&grade.results)
        .map(|((question, &selected), &correct)| McqResponse {
            mcq_id: question.mcq_id,
            user_id,
            selected_option: option_letter(selected).to_string(),
            correct_flag: correct,
            answered: true,
            respond_date: date.clone(),
        })
        .collect();

    let summary = SubmissionSummary {
        user_id,
        question_id: quiz.question_id(),
        total_mcq: grade.total,
        total_correct: grade.correct_count,
        total_avg_score: grade.average_score,
        question_weight: quiz.difficulty.weight(),
        weighted_score: grade.weighted_score,
        submitted_date: date,
    };

    Ok((SubmitRequest { responses, summary }, grade))
}

/// Answer state for the quiz screen
#[derive(Debug, Clone)]
pub struct QuizState {
    /// Day the quiz belongs to
    pub date: NaiveDate,
    /// Questions, once fetched
    pub quiz: Option<DailyQuiz>,
    /// Fetch in flight
    pub loading: bool,
    /// Fetch or submission failure to show in place of the questions
    pub error: Option<String>,
    /// Selected option per question
    pub answers: Vec<Option<usize>>,
    /// Question with keyboard focus
    pub current_question: usize,
    /// Option with keyboard focus
    pub highlighted_option: usize,
    /// Accepted by the backend; answers are read-only from here on
    pub submitted: bool,
    /// Grade of the accepted submission
    pub grade: Option<Grade>,
}

impl QuizState {
    /// Start loading the quiz for a day
    pub fn loading(date: NaiveDate) -> Self {
        Self {
            date,
            quiz: None,
            loading: true,
            error: None,
            answers: Vec::new(),
            current_question: 0,
            highlighted_option: 0,
            submitted: false,
            grade: None,
        }
    }

    /// Questions arrived
    pub fn load(&mut self, quiz: DailyQuiz) {
        self.answers = vec![None; quiz.questions.len()];
        self.quiz = Some(quiz);
        self.loading = false;
        self.error = None;
        self.current_question = 0;
        self.highlighted_option = 0;
    }

    /// Fetch failed
    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    pub fn questions(&self) -> &[Question] {
        self.quiz.as_ref().map(|q| q.questions.as_slice()).unwrap_or(&[])
    }

    pub fn current(&self) -> Option<&Question> {
        self.questions().get(self.current_question)
    }

    /// Answer the focused question with the highlighted option
    pub fn choose_highlighted(&mut self) -> bool {
        self.choose(self.current_question, self.highlighted_option)
    }

    /// Record an answer; ignored once submitted or when out of range
    pub fn choose(&mut self, question: usize, option: usize) -> bool {
        if self.submitted {
            return false;
        }
        let Some(q) = self.questions().get(question) else {
            return false;
        };
        if option >= q.options.len() {
            return false;
        }
        self.answers[question] = Some(option);
        true
    }

    pub fn next_option(&mut self) {
        if let Some(q) = self.current() {
            if self.highlighted_option + 1 < q.options.len() {
                self.highlighted_option += 1;
            }
        }
    }

    pub fn previous_option(&mut self) {
        self.highlighted_option = self.highlighted_option.saturating_sub(1);
    }

    pub fn next_question(&mut self) {
        if self.current_question + 1 < self.questions().len() {
            self.current_question += 1;
            self.sync_highlight();
        }
    }

    pub fn previous_question(&mut self) {
        if self.current_question > 0 {
            self.current_question -= 1;
            self.sync_highlight();
        }
    }

    fn sync_highlight(&mut self) {
        self.highlighted_option =
            self.answers.get(self.current_question).copied().flatten().unwrap_or(0);
    }

    /// Number of questions still unanswered
    pub fn unanswered(&self) -> usize {
        self.answers.iter().filter(|a| a.is_none()).count()
    }

    /// Lock the answers after the backend accepted them
    pub fn mark_submitted(&mut self, grade: Grade) {
        self.submitted = true;
        self.grade = Some(grade);
    }

    /// (correct, total) for an accepted submission
    pub fn score(&self) -> (usize, usize) {
        self.grade.as_ref().map(|g| (g.correct_count, g.total)).unwrap_or((0, 0))
    }

    /// Whether the accepted submission was fully correct
    pub fn passed(&self) -> bool {
        self.grade.as_ref().is_some_and(Grade::all_correct)
    }
}

//! Errors raised by user actions

use thiserror::Error;

use crate::gateway::GatewayError;
use crate::quiz::QuizError;

/// Why an action did not complete
///
/// None of these are fatal; each ends up as a notice on the command line.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Local input check failed; nothing was sent or changed
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Quiz(#[from] QuizError),

    /// Local persistence failed
    #[error("Could not save: {0:#}")]
    Storage(#[from] anyhow::Error),

    /// The action does not apply to the current state
    #[error("{0}")]
    NotAllowed(String),
}

impl ActionError {
    pub fn not_allowed(message: impl Into<String>) -> Self {
        Self::NotAllowed(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_keep_their_message() {
        let err: ActionError = QuizError::IncompleteAnswers { unanswered: 2 }.into();
        assert_eq!(err.to_string(), "Please answer all questions! (2 left)");

        let err: ActionError = GatewayError::Timeout { seconds: 10 }.into();
        assert_eq!(err.to_string(), "Request timed out after 10s");
    }

    #[test]
    fn storage_errors_show_context() {
        let err: ActionError =
            anyhow::anyhow!("disk full").context("Failed to write storage").into();
        assert_eq!(err.to_string(), "Could not save: Failed to write storage: disk full");
    }
}

//! Remote gateways
//!
//! Typed calls to the auth service and the workflow backend. [`HttpGateway`]
//! talks HTTP; [`DummyGateway`] answers in-process for offline use and tests.

pub mod client;
pub mod dummy;
pub mod error;
pub mod models;

use chrono::NaiveDate;

use crate::config::{BackendKind, Config};
use crate::quiz::DailyQuiz;

pub use client::HttpGateway;
pub use dummy::DummyGateway;
pub use error::GatewayError;
pub use models::{
    AttemptedDays, LoginGrant, LoginRequest, LogoutRequest, RemoteUser, SignUpRequest,
    SubmitOutcome, SubmitRequest,
};

/// Operations offered by the remote collaborators
///
/// Each call is made once; callers decide what a failure means.
#[allow(async_fn_in_trait)]
pub trait Gateway {
    /// Create an account, returning the server's confirmation message
    async fn sign_up(&self, request: &SignUpRequest) -> Result<String, GatewayError>;

    async fn login(&self, request: &LoginRequest) -> Result<LoginGrant, GatewayError>;

    async fn logout(&self, request: &LogoutRequest) -> Result<(), GatewayError>;

    /// Program start date and the days the backend holds responses for
    async fn attempted_days(&self, user_id: i64) -> Result<AttemptedDays, GatewayError>;

    /// Questions for one calendar day
    async fn questions(&self, date: NaiveDate) -> Result<DailyQuiz, GatewayError>;

    async fn submit(&self, request: &SubmitRequest) -> Result<SubmitOutcome, GatewayError>;
}

/// The gateway selected by configuration
#[derive(Debug)]
pub enum Backend {
    Remote(HttpGateway),
    Offline(DummyGateway),
}

impl Backend {
    /// Build the configured backend
    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        match config.backend {
            BackendKind::Remote => {
                tracing::info!("Using remote backend at {}", config.backend_url);
                Ok(Self::Remote(HttpGateway::new(config)?))
            }
            BackendKind::Offline => {
                tracing::info!("Using offline backend");
                Ok(Self::Offline(DummyGateway::new()))
            }
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Offline(_))
    }
}

impl Gateway for Backend {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<String, GatewayError> {
        match self {
            Self::Remote(g) => g.sign_up(request).await,
            Self::Offline(g) => g.sign_up(request).await,
        }
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginGrant, GatewayError> {
        match self {
            Self::Remote(g) => g.login(request).await,
            Self::Offline(g) => g.login(request).await,
        }
    }

    async fn logout(&self, request: &LogoutRequest) -> Result<(), GatewayError> {
        match self {
            Self::Remote(g) => g.logout(request).await,
            Self::Offline(g) => g.logout(request).await,
        }
    }

    async fn attempted_days(&self, user_id: i64) -> Result<AttemptedDays, GatewayError> {
        match self {
            Self::Remote(g) => g.attempted_days(user_id).await,
            Self::Offline(g) => g.attempted_days(user_id).await,
        }
    }

    async fn questions(&self, date: NaiveDate) -> Result<DailyQuiz, GatewayError> {
        match self {
            Self::Remote(g) => g.questions(date).await,
            Self::Offline(g) => g.questions(date).await,
        }
    }

    async fn submit(&self, request: &SubmitRequest) -> Result<SubmitOutcome, GatewayError> {
        match self {
            Self::Remote(g) => g.submit(request).await,
            Self::Offline(g) => g.submit(request).await,
        }
    }
}

//! HTTP client for the auth service and workflow backend

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;

use super::Gateway;
use super::error::GatewayError;
use super::models::{
    AttemptedDays, AttemptedDaysRequest, LoginGrant, LoginRequest, LoginResponse, LogoutRequest,
    QuestionsRequest, SignUpRequest, SignUpResponse, SubmitOutcome, SubmitRequest, SubmitResponse,
    first_item, parse_daily_quiz,
};
use crate::config::Config;
use crate::quiz::DailyQuiz;

/// Gateway backed by real HTTP endpoints
///
/// Every call is a single POST with a JSON body. There are no retries; a
/// failure is returned to the caller unchanged.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    /// HTTP client
    client: Client,
    /// Workflow backend base URL
    backend_url: String,
    /// Auth service base URL
    auth_url: String,
    /// Timeout for sign-up, login and logout
    auth_timeout: Duration,
    /// Timeout for everything else
    request_timeout: Duration,
}

impl HttpGateway {
    const SIGN_UP_PATH: &'static str = "signup";
    const LOGIN_PATH: &'static str = "login";
    const LOGOUT_PATH: &'static str = "logout";
    const ATTEMPTED_DAYS_PATH: &'static str = "getAttemptedDays";
    const QUESTIONS_PATH: &'static str = "getQuestions";
    const SUBMIT_PATH: &'static str = "submitResponse";

    /// Create a gateway from the configured URLs and timeouts
    pub fn new(config: &Config) -> Result<Self, GatewayError> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            backend_url: trim_base(&config.backend_url),
            auth_url: trim_base(config.auth_base_url()),
            auth_timeout: config.auth_timeout(),
            request_timeout: config.request_timeout(),
        })
    }

    /// POST a JSON body and return the decoded response with list wrapping removed
    async fn post<B: Serialize + ?Sized>(
        &self,
        base: &str,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<Value, GatewayError> {
        let url = format!("{}/{}", base, path);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| classify(e, &url, timeout))?;

        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            let message = if message.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                message
            };
            tracing::warn!("POST {} failed with {}", url, status);
            return Err(GatewayError::Http { status: status.as_u16(), message });
        }

        let text = response.text().await.map_err(|e| classify(e, &url, timeout))?;
        if text.trim().is_empty() || status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        let value: Value = serde_json::from_str(&text).map_err(|e| {
            tracing::warn!("Non-JSON response from {}: {}", url, e);
            GatewayError::UnexpectedResponse(format!("response from {} is not JSON", path))
        })?;
        Ok(first_item(value))
    }
}

impl Gateway for HttpGateway {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<String, GatewayError> {
        let body = self.post(&self.auth_url, Self::SIGN_UP_PATH, request, self.auth_timeout).await?;
        let response: SignUpResponse = serde_json::from_value(body)?;
        response.into_result()
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginGrant, GatewayError> {
        let body = self
            .post(&self.auth_url, Self::LOGIN_PATH, request, self.auth_timeout)
            .await
            .map_err(|e| match e {
                GatewayError::Http { status: 401 | 404, .. } => {
                    GatewayError::Rejected("Invalid email or password".to_string())
                }
                other => other,
            })?;
        let response: LoginResponse = serde_json::from_value(body)?;
        response.into_grant()
    }

    async fn logout(&self, request: &LogoutRequest) -> Result<(), GatewayError> {
        let body = self.post(&self.auth_url, Self::LOGOUT_PATH, request, self.auth_timeout).await?;
        tracing::debug!("Logout response: {}", body);
        Ok(())
    }

    async fn attempted_days(&self, user_id: i64) -> Result<AttemptedDays, GatewayError> {
        let request = AttemptedDaysRequest { user_id };
        let body = self
            .post(&self.backend_url, Self::ATTEMPTED_DAYS_PATH, &request, self.request_timeout)
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn questions(&self, date: NaiveDate) -> Result<DailyQuiz, GatewayError> {
        let request = QuestionsRequest { current_date: date.format("%Y-%m-%d").to_string() };
        let body = self
            .post(&self.backend_url, Self::QUESTIONS_PATH, &request, self.request_timeout)
            .await?;
        parse_daily_quiz(body)
    }

    async fn submit(&self, request: &SubmitRequest) -> Result<SubmitOutcome, GatewayError> {
        let body =
            self.post(&self.backend_url, Self::SUBMIT_PATH, request, self.request_timeout).await?;
        let response: SubmitResponse = serde_json::from_value(body).map_err(|e| {
            tracing::warn!("Unexpected submission response: {}", e);
            GatewayError::UnexpectedResponse(e.to_string())
        })?;
        response.into_outcome()
    }
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Split transport failures into timeout, unreachable and everything else
fn classify(error: reqwest::Error, url: &str, timeout: Duration) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout { seconds: timeout.as_secs() }
    } else if error.is_connect() {
        GatewayError::Unreachable { url: url.to_string() }
    } else {
        GatewayError::Request(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation_uses_config() {
        let config = Config::default()
            .with_overrides(Some("https://flows.example.com/webhook/".into()), None);
        let gateway = HttpGateway::new(&config).unwrap();
        assert_eq!(gateway.backend_url, "https://flows.example.com/webhook");
        assert_eq!(gateway.auth_url, gateway.backend_url);
        assert_eq!(gateway.auth_timeout, Duration::from_secs(10));
    }

    #[test]
    fn trim_base_strips_trailing_slashes() {
        assert_eq!(trim_base(" http://x/api// "), "http://x/api");
    }
}

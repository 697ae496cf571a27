//! Learner account sign-in and sign-up.
//!
//! There is no account database: the demo gateway checks that the form is
//! filled in, waits a fixed latency and accepts. Whether a learner lands on
//! the dashboard afterwards depends only on the level already in the session.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::instrument;

/// Account errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter your password")]
    MissingPassword,
    #[error("Please enter your name")]
    MissingName,
}

/// Login form contents.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Signup form contents.
#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Capability to authenticate and register learners.
#[async_trait]
pub trait AccountGateway: Send + Sync {
    /// Authenticate a returning learner.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError`] if the request is incomplete.
    async fn login(&self, request: &LoginRequest) -> Result<(), AccountError>;

    /// Register a new learner.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError`] if the request is incomplete.
    async fn signup(&self, request: &SignupRequest) -> Result<(), AccountError>;
}

/// Gateway that accepts any complete form after a fixed delay.
#[derive(Debug, Clone, Default)]
pub struct DemoAccountGateway {
    latency: Duration,
}

impl DemoAccountGateway {
    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }

    async fn simulate_round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl AccountGateway for DemoAccountGateway {
    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn login(&self, request: &LoginRequest) -> Result<(), AccountError> {
        validate_email(&request.email)?;
        if request.password.is_empty() {
            return Err(AccountError::MissingPassword);
        }

        self.simulate_round_trip().await;
        tracing::info!("Learner logged in");
        Ok(())
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn signup(&self, request: &SignupRequest) -> Result<(), AccountError> {
        if request.name.trim().is_empty() {
            return Err(AccountError::MissingName);
        }
        validate_email(&request.email)?;
        if request.password.is_empty() {
            return Err(AccountError::MissingPassword);
        }

        self.simulate_round_trip().await;
        tracing::info!("Learner signed up");
        Ok(())
    }
}

/// Basic email validation.
pub(crate) fn validate_email(email: &str) -> Result<(), AccountError> {
    let mut parts = email.trim().splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(AccountError::InvalidEmail);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("explorer@atribot.in").is_ok());
        assert!(validate_email("  kid@school.org ").is_ok());
        assert_eq!(validate_email("nobody"), Err(AccountError::InvalidEmail));
        assert_eq!(validate_email("@atribot.in"), Err(AccountError::InvalidEmail));
        assert_eq!(validate_email("kid@localhost"), Err(AccountError::InvalidEmail));
    }

    #[tokio::test]
    async fn test_login_accepts_complete_form() {
        let gateway = DemoAccountGateway::default();
        assert!(gateway.login(&login("kid@atribot.in", "pw")).await.is_ok());
    }

    #[tokio::test]
    async fn test_login_requires_password() {
        let gateway = DemoAccountGateway::default();
        assert_eq!(
            gateway.login(&login("kid@atribot.in", "")).await,
            Err(AccountError::MissingPassword)
        );
    }

    #[tokio::test]
    async fn test_signup_requires_name() {
        let gateway = DemoAccountGateway::default();
        let request = SignupRequest {
            name: "   ".to_string(),
            email: "kid@atribot.in".to_string(),
            password: "pw".to_string(),
        };
        assert_eq!(gateway.signup(&request).await, Err(AccountError::MissingName));
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_waits_for_latency() {
        let gateway = DemoAccountGateway::new(Duration::from_millis(1000));
        let started = tokio::time::Instant::now();

        gateway.login(&login("kid@atribot.in", "pw")).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_form_fails_fast() {
        let gateway = DemoAccountGateway::new(Duration::from_millis(1000));
        let started = tokio::time::Instant::now();

        assert!(gateway.login(&login("nope", "pw")).await.is_err());

        assert!(started.elapsed() < Duration::from_millis(1000));
    }
}

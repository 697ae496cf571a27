//! Authentication route handlers.
//!
//! Login and signup go through the [`AccountGateway`](crate::services::AccountGateway).
//! A successful login only reaches the dashboard when the session already
//! holds an activated level; otherwise the learner is sent to activate a kit.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalLearner;
use crate::models::LearnerSession;
use crate::services::{AccountError, LoginRequest, SignupRequest};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Signup form data.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub tab: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub signed_in: bool,
    pub error: Option<&'static str>,
    /// Show the signup form first.
    pub signup_tab: bool,
}

/// Map an `?error=` code to its message.
fn error_message(code: &str) -> Option<&'static str> {
    match code {
        "invalid_email" => Some("Please enter a valid email address"),
        "missing_password" => Some("Please enter your password"),
        "missing_name" => Some("Please enter your name"),
        _ => None,
    }
}

/// Map an account error to its `?error=` code.
const fn error_code(error: &AccountError) -> &'static str {
    match error {
        AccountError::InvalidEmail => "invalid_email",
        AccountError::MissingPassword => "missing_password",
        AccountError::MissingName => "missing_name",
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalLearner(learner): OptionalLearner,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        signed_in: learner.is_some(),
        error: query.error.as_deref().and_then(error_message),
        signup_tab: query.tab.as_deref() == Some("signup"),
    }
}

/// Handle login form submission.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect> {
    let request = LoginRequest {
        email: form.email,
        password: form.password,
    };

    if let Err(e) = state.accounts().login(&request).await {
        tracing::warn!(error = %e, "Login failed");
        return Ok(Redirect::to(&format!("/login?error={}", error_code(&e))));
    }

    let mut learner = LearnerSession::load(&session).await;
    if learner.level.is_none() {
        tracing::info!("Login without an activated kit");
        return Ok(Redirect::to("/kit_activation"));
    }

    learner.authenticated = true;
    learner.store(&session).await?;
    Ok(Redirect::to("/dashboard"))
}

/// Handle signup form submission. New accounts always activate a kit next.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Redirect {
    let request = SignupRequest {
        name: form.name,
        email: form.email,
        password: form.password,
    };

    match state.accounts().signup(&request).await {
        Ok(()) => Redirect::to("/kit_activation"),
        Err(e) => {
            tracing::warn!(error = %e, "Signup failed");
            Redirect::to(&format!("/login?tab=signup&error={}", error_code(&e)))
        }
    }
}

/// Handle logout. Clears the learner session and returns to the landing page.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect> {
    LearnerSession::clear(&session).await?;
    tracing::info!("Learner logged out");
    Ok(Redirect::to("/"))
}

//! Kit activation route handlers.
//!
//! Each POST drives a fresh [`ActivationFlow`] through one submission. An
//! accepted level is parked in the session until the learner presses
//! "continue", which signs them in.

use askama::Template;
use askama_web::WebTemplate;
use atribot_core::activation::{ActivationFlow, ActivationState};
use atribot_core::format_license_key;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::LevelView;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::OptionalLearner;
use crate::models::LearnerSession;
use crate::models::session::{set_pending_level, take_pending_level};
use crate::state::AppState;

// =============================================================================
// Form & Query Types
// =============================================================================

/// Query parameters for the activation page.
#[derive(Debug, Deserialize)]
pub struct ActivationQuery {
    /// Key printed in a kit-card QR code.
    pub key: Option<String>,
}

/// Activation form data.
#[derive(Debug, Deserialize)]
pub struct ActivationForm {
    #[serde(default)]
    pub key: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Activation page template.
#[derive(Template, WebTemplate)]
#[template(path = "kit_activation.html")]
pub struct ActivationTemplate {
    pub signed_in: bool,
    /// Key shown in the input, already formatted.
    pub key: String,
    pub error: Option<String>,
    /// Set once a key was accepted.
    pub unlocked: Option<LevelView>,
}

impl ActivationTemplate {
    fn form(signed_in: bool, key: String, error: Option<String>) -> Self {
        Self {
            signed_in,
            key,
            error,
            unlocked: None,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the activation form, prefilled from `?key=`.
pub async fn show(
    OptionalLearner(learner): OptionalLearner,
    Query(query): Query<ActivationQuery>,
) -> impl IntoResponse {
    let key = query
        .key
        .as_deref()
        .map(format_license_key)
        .unwrap_or_default();
    ActivationTemplate::form(learner.is_some(), key, None)
}

/// Check a submitted key.
///
/// Format errors are reported without calling the license authority.
/// Rejections come back after the authority's full round trip.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    OptionalLearner(learner): OptionalLearner,
    session: Session,
    Form(form): Form<ActivationForm>,
) -> Result<Response> {
    let signed_in = learner.is_some();
    let shown_key = format_license_key(&form.key);
    let mut flow = ActivationFlow::new();

    let key = match flow.submit(&form.key) {
        Ok(key) => key,
        Err(e) => {
            tracing::debug!(error = %e, "Activation key has the wrong format");
            let page = ActivationTemplate::form(signed_in, shown_key, Some(e.to_string()));
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let outcome = state.licenses().check(&key).await;
    let resolved = flow
        .resolve(outcome)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    match resolved {
        ActivationState::Accepted(level) => {
            set_pending_level(&session, level).await?;
            add_breadcrumb("activation", "Kit activated", Some(&[("level", level.as_str())]));
            tracing::info!(level = %level, "Kit activation accepted");

            Ok(ActivationTemplate {
                signed_in,
                key: key.to_string(),
                error: None,
                unlocked: Some(LevelView::new(level.info(), Some(level))),
            }
            .into_response())
        }
        ActivationState::Rejected(reason) => {
            tracing::info!("Kit activation rejected");
            let page = ActivationTemplate::form(
                signed_in,
                key.to_string(),
                Some(reason.message().to_string()),
            );
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        ActivationState::Idle | ActivationState::Submitting => Err(AppError::Internal(
            "activation flow did not settle".to_string(),
        )),
    }
}

/// Sign the learner in at the accepted level and go to the dashboard.
///
/// Without an accepted level the learner is sent back to the form.
#[instrument(skip_all)]
pub async fn continue_to_dashboard(session: Session) -> Result<Redirect> {
    let Some(level) = take_pending_level(&session).await? else {
        return Ok(Redirect::to("/kit_activation"));
    };

    LearnerSession::signed_in(level).store(&session).await?;
    tracing::info!(level = %level, "Learner signed in after activation");
    Ok(Redirect::to("/dashboard"))
}

//! Contact form route handlers.
//!
//! Messages are logged for the support team; there is no mail delivery.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalLearner;
use crate::services::accounts::validate_email;

/// Longest message accepted from the form, in characters.
const MAX_MESSAGE_LEN: usize = 5_000;

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub signed_in: bool,
    pub error: Option<&'static str>,
    pub sent: bool,
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactTemplate {
    fn blank(signed_in: bool) -> Self {
        Self {
            signed_in,
            error: None,
            sent: false,
            name: String::new(),
            email: String::new(),
            message: String::new(),
        }
    }
}

/// First problem with a submission, if any.
fn validation_error(form: &ContactForm) -> Option<&'static str> {
    if form.name.trim().is_empty() || form.message.trim().is_empty() {
        Some("Name and message are required.")
    } else if validate_email(&form.email).is_err() {
        Some("Please enter a valid email address.")
    } else if form.message.chars().count() > MAX_MESSAGE_LEN {
        Some("Your message is too long.")
    } else {
        None
    }
}

/// Display the contact page.
pub async fn show(OptionalLearner(learner): OptionalLearner) -> impl IntoResponse {
    ContactTemplate::blank(learner.is_some())
}

/// Handle contact form submission.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn submit(
    OptionalLearner(learner): OptionalLearner,
    Form(form): Form<ContactForm>,
) -> impl IntoResponse {
    let signed_in = learner.is_some();

    if let Some(error) = validation_error(&form) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            ContactTemplate {
                signed_in,
                error: Some(error),
                sent: false,
                name: form.name,
                email: form.email,
                message: form.message,
            },
        );
    }

    tracing::info!(
        name = %form.name.trim(),
        message_chars = form.message.chars().count(),
        "Contact message received"
    );

    (
        StatusCode::OK,
        ContactTemplate {
            sent: true,
            ..ContactTemplate::blank(signed_in)
        },
    )
}

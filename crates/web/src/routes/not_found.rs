//! Catch-all not found page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::{StatusCode, Uri},
    response::IntoResponse,
};

use crate::filters;
use crate::middleware::OptionalLearner;

/// Not found page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub signed_in: bool,
    pub path: String,
}

/// Render the 404 page for any unmatched path.
pub async fn not_found(OptionalLearner(learner): OptionalLearner, uri: Uri) -> impl IntoResponse {
    tracing::debug!(path = %uri.path(), "Route not found");
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            signed_in: learner.is_some(),
            path: uri.path().to_string(),
        },
    )
}

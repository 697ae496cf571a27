//! Back-office route handlers.
//!
//! Mounted under `/admin` behind the same session guard as the learner pages.
//! Mutations redirect back to their list page with a `?notice=` or `?error=`
//! code that the list page turns into a flash message.

pub mod courses;
pub mod dashboard;
pub mod license;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the back-office router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/license", get(license::index))
        .route("/license/generate", post(license::generate))
        .route("/license/export.csv", get(license::export))
        .route("/license/{id}/qr", get(license::qr))
        .route("/courses", get(courses::index).post(courses::create))
        .route("/courses/{id}", post(courses::update))
        .route("/courses/{id}/publish", post(courses::toggle_publish))
        .route("/courses/{id}/delete", post(courses::delete))
}

/// Query parameters carrying a flash message after a redirect.
#[derive(Debug, Default, serde::Deserialize)]
pub struct FlashQuery {
    pub notice: Option<String>,
    pub error: Option<String>,
}

/// Redirect target with a flash code appended to `path`.
fn flash_url(path: &str, kind: &str, code: &str) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}{kind}={code}")
}

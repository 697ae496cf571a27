//! Back-office dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::middleware::Learner;
use crate::state::AppState;

/// Headline counts on the back-office dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminStats {
    pub keys_total: usize,
    pub keys_used: usize,
    pub keys_available: usize,
    pub courses_total: usize,
    pub courses_published: usize,
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub signed_in: bool,
    pub current_path: &'static str,
    pub stats: AdminStats,
}

/// Collect the dashboard counts from the stores.
pub async fn collect_stats(state: &AppState) -> AdminStats {
    let keys = state.inventory().stats().await;
    AdminStats {
        keys_total: keys.total,
        keys_used: keys.used,
        keys_available: keys.available,
        courses_total: state.shelf().total().await,
        courses_published: state.shelf().published_count().await,
    }
}

/// Dashboard page handler.
#[instrument(skip_all)]
pub async fn index(_learner: Learner, State(state): State<AppState>) -> impl IntoResponse {
    AdminDashboardTemplate {
        signed_in: true,
        current_path: "/admin",
        stats: collect_stats(&state).await,
    }
}

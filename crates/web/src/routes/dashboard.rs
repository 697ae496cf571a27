//! Learner dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use atribot_core::catalog::{lessons_for, sample_courses};
use atribot_core::gate::unlocked_courses;
use axum::response::IntoResponse;
use tower_sessions::Session;
use tracing::instrument;

use super::{CourseCard, LevelView};
use crate::filters;
use crate::middleware::Learner;
use crate::models::LearnerProfile;

/// Courses shown under "Your Courses".
const RECENT_COURSES: usize = 3;

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub signed_in: bool,
    pub learner_name: String,
    pub level: LevelView,
    pub levels: Vec<LevelView>,
    pub courses_available: usize,
    pub lessons_available: usize,
    pub courses_total: usize,
    pub courses: Vec<CourseCard>,
}

/// Display the dashboard for the signed-in learner.
#[instrument(skip_all)]
pub async fn dashboard(Learner(learner): Learner, session: Session) -> impl IntoResponse {
    let level = learner.level();
    let unlocked = unlocked_courses(sample_courses(), Some(level));
    let lessons_available = unlocked.iter().map(|c| lessons_for(c).len()).sum();

    DashboardTemplate {
        signed_in: true,
        learner_name: LearnerProfile::load(&session).await.name,
        level: LevelView::new(level.info(), Some(level)),
        levels: LevelView::all(Some(level)),
        courses_available: unlocked.len(),
        lessons_available,
        courses_total: sample_courses().len(),
        courses: unlocked
            .iter()
            .take(RECENT_COURSES)
            .map(|c| CourseCard::new(c, level))
            .collect(),
    }
}

//! Learner profile route handlers.
//!
//! Stats are computed from the lessons completed in this session, over the
//! courses unlocked at the learner's level.

use askama::Template;
use askama_web::WebTemplate;
use atribot_core::catalog::sample_courses;
use atribot_core::gate::unlocked_courses;
use atribot_core::progress::{ProgressSummary, summarize};
use axum::{
    Form,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::LevelView;
use crate::error::Result;
use crate::filters;
use crate::middleware::{Learner, LearnerContext};
use crate::models::LearnerProfile;
use crate::models::session::completed_lessons;
use crate::services::accounts::validate_email;

/// Longest display name accepted, in characters.
const MAX_NAME_LEN: usize = 80;

/// Lessons needed for "Quick Learner".
const QUICK_LEARNER_LESSONS: usize = 5;

// =============================================================================
// Form & Query Types
// =============================================================================

/// Account settings form data.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Query parameters after a save.
#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    pub notice: Option<String>,
}

// =============================================================================
// View Models
// =============================================================================

/// An achievement badge.
#[derive(Clone)]
pub struct Achievement {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub earned: bool,
}

fn achievements(stats: &ProgressSummary) -> Vec<Achievement> {
    vec![
        Achievement {
            icon: "🚀",
            title: "First Steps",
            description: "Completed your first lesson",
            earned: stats.lessons_completed > 0,
        },
        Achievement {
            icon: "🤖",
            title: "Robot Builder",
            description: "Built your first robot",
            earned: stats.courses_completed > 0,
        },
        Achievement {
            icon: "⭐",
            title: "Quick Learner",
            description: "Completed 5 lessons in one day",
            earned: stats.lessons_completed >= QUICK_LEARNER_LESSONS,
        },
    ]
}

// =============================================================================
// Templates
// =============================================================================

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub signed_in: bool,
    pub name: String,
    pub email: String,
    pub level: LevelView,
    /// The level a new kit would unlock; `None` at the top level.
    pub next_level: Option<LevelView>,
    pub stats: ProgressSummary,
    /// Completed lesson time, one decimal place.
    pub hours_learned: String,
    pub achievements: Vec<Achievement>,
    pub achievements_earned: usize,
    /// Values shown in the settings form.
    pub form_name: String,
    pub form_email: String,
    pub notice: Option<&'static str>,
    pub error: Option<&'static str>,
}

impl ProfileTemplate {
    async fn build(learner: LearnerContext, session: &Session, profile: LearnerProfile) -> Self {
        let level = learner.level();
        let unlocked = unlocked_courses(sample_courses(), Some(level));
        let stats = summarize(unlocked, &completed_lessons(session).await);
        let achievements = achievements(&stats);

        Self {
            signed_in: true,
            form_name: profile.name.clone(),
            form_email: profile.email.clone(),
            name: profile.name,
            email: profile.email,
            level: LevelView::new(level.info(), Some(level)),
            next_level: level.next().map(|next| LevelView::new(next.info(), Some(level))),
            hours_learned: format!("{:.1}", f64::from(stats.minutes_learned) / 60.0),
            achievements_earned: achievements.iter().filter(|a| a.earned).count(),
            achievements,
            stats,
            notice: None,
            error: None,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the profile card, stats and account settings.
#[instrument(skip_all)]
pub async fn profile(
    Learner(learner): Learner,
    session: Session,
    Query(query): Query<ProfileQuery>,
) -> impl IntoResponse {
    let profile = LearnerProfile::load(&session).await;
    let mut page = ProfileTemplate::build(learner, &session, profile).await;
    page.notice = query
        .notice
        .as_deref()
        .filter(|code| *code == "saved")
        .map(|_| "Your changes have been saved.");
    page
}

/// Save the display name and email.
#[instrument(skip_all)]
pub async fn update(
    Learner(learner): Learner,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    if let Some(error) = validation_error(&form) {
        let current = LearnerProfile::load(&session).await;
        let mut page = ProfileTemplate::build(learner, &session, current).await;
        page.form_name = form.name;
        page.form_email = form.email;
        page.error = Some(error);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    LearnerProfile {
        name: form.name.trim().to_owned(),
        email: form.email.trim().to_owned(),
    }
    .store(&session)
    .await?;
    tracing::info!("Profile updated");

    Ok(Redirect::to("/profile?notice=saved").into_response())
}

fn validation_error(form: &ProfileForm) -> Option<&'static str> {
    let name = form.name.trim();
    if name.is_empty() {
        Some("Please enter a display name.")
    } else if name.chars().count() > MAX_NAME_LEN {
        Some("That display name is too long.")
    } else if validate_email(&form.email).is_err() {
        Some("Please enter a valid email address.")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str) -> ProfileForm {
        ProfileForm {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn test_validation() {
        assert_eq!(validation_error(&form("Asha", "asha@example.com")), None);
        assert_eq!(
            validation_error(&form("  ", "asha@example.com")),
            Some("Please enter a display name.")
        );
        assert_eq!(
            validation_error(&form("Asha", "asha")),
            Some("Please enter a valid email address.")
        );
        assert_eq!(
            validation_error(&form(&"🤖".repeat(MAX_NAME_LEN), "a@b.in")),
            None
        );
        assert_eq!(
            validation_error(&form(&"a".repeat(MAX_NAME_LEN + 1), "a@b.in")),
            Some("That display name is too long.")
        );
    }

    #[test]
    fn test_achievements_follow_progress() {
        let none = achievements(&ProgressSummary::default());
        assert!(none.iter().all(|a| !a.earned));

        let stats = ProgressSummary {
            lessons_completed: 4,
            courses_completed: 1,
            ..ProgressSummary::default()
        };
        let earned: Vec<&str> = achievements(&stats)
            .iter()
            .filter(|a| a.earned)
            .map(|a| a.title)
            .collect();
        assert_eq!(earned, ["First Steps", "Robot Builder"]);
    }
}

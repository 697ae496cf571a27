//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Landing page
//! GET  /health                        - Health check
//! GET  /contact                       - Contact form
//! POST /contact                       - Contact form submission
//!
//! # Kit activation
//! GET  /kit_activation[?key=]         - Activation form (prefilled from QR cards)
//! POST /kit_activation                - Check a license key
//! POST /kit_activation/continue       - Sign in at the accepted level
//!
//! # Auth
//! GET  /login                         - Login and signup forms
//! POST /login                         - Login action
//! POST /signup                        - Signup action
//! POST /logout                        - Logout action
//!
//! # Learner (requires session, see middleware::guard)
//! GET  /dashboard                     - Level overview and courses
//! GET  /courses[?level=&q=]           - Unlocked course list
//! GET  /courses/{slug}                - Course detail or locked page
//! GET  /courses/{slug}/lesson/{id}    - Lesson viewer
//! POST /courses/{slug}/lesson/{id}/complete - Mark a lesson as completed
//! GET  /profile[?notice=]             - Profile card, stats and settings
//! POST /profile                       - Save display name and email
//!
//! # Admin (requires session)
//! GET  /admin                         - Back-office dashboard
//! GET  /admin/license                 - License keys (?q=&level=&status=)
//! POST /admin/license/generate        - Generate keys
//! GET  /admin/license/export.csv      - CSV export of the filtered keys
//! GET  /admin/license/{id}/qr         - QR card for one key
//! GET  /admin/courses                 - Course shelf (?q=&level=)
//! POST /admin/courses                 - Create a draft course
//! POST /admin/courses/{id}            - Update a course
//! POST /admin/courses/{id}/publish    - Toggle published
//! POST /admin/courses/{id}/delete     - Delete a course
//! ```

pub mod activation;
pub mod admin;
pub mod auth;
pub mod contact;
pub mod courses;
pub mod dashboard;
pub mod home;
pub mod not_found;
pub mod profile;

use atribot_core::catalog::Course;
use atribot_core::gate::is_unlocked;
use atribot_core::{LEVELS, Level, LevelId};
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

// =============================================================================
// Shared View Models
// =============================================================================

/// Level display data for templates.
#[derive(Clone)]
pub struct LevelView {
    pub id: &'static str,
    pub number: u8,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub unlocked: bool,
    pub current: bool,
}

impl LevelView {
    /// View of `level` for a learner at `current` (anonymous when `None`).
    #[must_use]
    pub fn new(level: &'static Level, current: Option<LevelId>) -> Self {
        Self {
            id: level.id.as_str(),
            number: level.number,
            name: level.name,
            description: level.description,
            icon: level.icon,
            color: level.color,
            unlocked: current.is_some() && is_unlocked(level.id, current),
            current: current == Some(level.id),
        }
    }

    /// Every level, in order.
    #[must_use]
    pub fn all(current: Option<LevelId>) -> Vec<Self> {
        LEVELS.iter().map(|level| Self::new(level, current)).collect()
    }
}

/// Course card display data for templates.
#[derive(Clone)]
pub struct CourseCard {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub level: LevelView,
    pub thumbnail: String,
    pub lessons_count: u32,
    pub duration: String,
    pub unlocked: bool,
}

impl CourseCard {
    #[must_use]
    pub fn new(course: &Course, current: LevelId) -> Self {
        Self {
            slug: course.slug.clone(),
            title: course.title.clone(),
            description: course.description.clone(),
            level: LevelView::new(course.level.info(), Some(current)),
            thumbnail: course.thumbnail.clone(),
            lessons_count: course.lessons_count,
            duration: course.duration.clone(),
            unlocked: is_unlocked(course.level, Some(current)),
        }
    }
}

/// Parse a `?level=` value. Blank, `ALL` and unknown values mean "any level".
#[must_use]
pub fn parse_level_param(raw: Option<&str>) -> Option<LevelId> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
        .and_then(|v| v.parse().ok())
}

// =============================================================================
// Routers
// =============================================================================

/// Create the kit activation routes router.
pub fn activation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(activation::show).post(activation::submit))
        .route("/continue", post(activation::continue_to_dashboard))
}

/// Create the course routes router.
pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(courses::index))
        .route("/{slug}", get(courses::show))
        .route("/{slug}/lesson/{lesson_id}", get(courses::lesson))
        .route(
            "/{slug}/lesson/{lesson_id}/complete",
            post(courses::complete),
        )
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Marketing
        .route("/", get(home::home))
        .route("/contact", get(contact::show).post(contact::submit))
        // Kit activation
        .nest("/kit_activation", activation_routes())
        // Auth
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/logout", post(auth::logout))
        // Learner
        .route("/dashboard", get(dashboard::dashboard))
        .nest("/courses", course_routes())
        .route("/profile", get(profile::profile).post(profile::update))
        // Back office
        .nest("/admin", admin::routes())
        .fallback(not_found::not_found)
}

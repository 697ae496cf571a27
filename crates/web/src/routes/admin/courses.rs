//! Course shelf management handlers.

use askama::Template;
use askama_web::WebTemplate;
use atribot_core::catalog::CourseQuery;
use atribot_core::{CourseId, LevelId};
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use super::{FlashQuery, flash_url};
use crate::filters;
use crate::middleware::Learner;
use crate::routes::{LevelView, parse_level_param};
use crate::services::{CourseDraft, ShelfCourse, ShelfError};
use crate::state::AppState;

const LIST_PATH: &str = "/admin/courses";

// =============================================================================
// Query & Form Types
// =============================================================================

/// Course shelf filters.
#[derive(Debug, Default, Deserialize)]
pub struct ShelfQuery {
    pub q: Option<String>,
    pub level: Option<String>,
}

/// Create and edit form.
#[derive(Debug, Deserialize)]
pub struct CourseForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub level: String,
}

impl CourseForm {
    /// Unknown levels fall back to level 1, the form's default choice.
    fn into_draft(self) -> CourseDraft {
        CourseDraft {
            title: self.title,
            description: self.description,
            level: self.level.trim().parse().unwrap_or_default(),
        }
    }
}

// =============================================================================
// View Models
// =============================================================================

/// One row in the course shelf.
#[derive(Debug, Clone)]
pub struct ShelfRow {
    pub id: u32,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub level_id: &'static str,
    pub level_name: &'static str,
    pub level_number: u8,
    pub thumbnail: String,
    pub lessons_count: u32,
    pub duration: String,
    pub published: bool,
}

impl From<&ShelfCourse> for ShelfRow {
    fn from(entry: &ShelfCourse) -> Self {
        let course = &entry.course;
        Self {
            id: course.id.get(),
            slug: course.slug.clone(),
            title: course.title.clone(),
            description: course.description.clone(),
            level_id: course.level.as_str(),
            level_name: course.level.name(),
            level_number: course.level.number(),
            thumbnail: course.thumbnail.clone(),
            lessons_count: course.lessons_count,
            duration: course.duration.clone(),
            published: entry.is_published(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Course shelf page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/courses.html")]
pub struct ShelfIndexTemplate {
    pub signed_in: bool,
    pub current_path: &'static str,
    pub rows: Vec<ShelfRow>,
    pub total: usize,
    pub published: usize,
    pub levels: Vec<LevelView>,
    pub search: String,
    pub level: String,
    pub notice: Option<&'static str>,
    pub error: Option<&'static str>,
}

fn notice_message(code: &str) -> Option<&'static str> {
    match code {
        "created" => Some("Course created as a draft."),
        "updated" => Some("Course updated."),
        "published" => Some("Course published."),
        "unpublished" => Some("Course moved back to drafts."),
        "deleted" => Some("Course deleted."),
        _ => None,
    }
}

fn error_message(code: &str) -> Option<&'static str> {
    match code {
        "missing_title" => Some("Please enter a course title."),
        "not_found" => Some("That course no longer exists."),
        _ => None,
    }
}

const fn error_code(error: &ShelfError) -> &'static str {
    match error {
        ShelfError::MissingTitle => "missing_title",
        ShelfError::NotFound(_) => "not_found",
    }
}

fn done(notice: &str) -> Redirect {
    Redirect::to(&flash_url(LIST_PATH, "notice", notice))
}

fn failed(error: &ShelfError) -> Redirect {
    tracing::warn!(error = %error, "Course shelf change rejected");
    Redirect::to(&flash_url(LIST_PATH, "error", error_code(error)))
}

fn parse_id(raw: &str) -> Option<CourseId> {
    raw.trim().parse().ok()
}

// =============================================================================
// Handlers
// =============================================================================

/// Course shelf page handler.
#[instrument(skip_all)]
pub async fn index(
    _learner: Learner,
    State(state): State<AppState>,
    Query(query): Query<ShelfQuery>,
    Query(flash): Query<FlashQuery>,
) -> impl IntoResponse {
    let filter = CourseQuery {
        level: parse_level_param(query.level.as_deref()),
        search: query.q.unwrap_or_default(),
    };
    let courses = state.shelf().list(&filter).await;

    ShelfIndexTemplate {
        signed_in: true,
        current_path: LIST_PATH,
        rows: courses.iter().map(ShelfRow::from).collect(),
        total: state.shelf().total().await,
        published: state.shelf().published_count().await,
        levels: LevelView::all(None),
        level: filter.level.map(LevelId::as_str).unwrap_or_default().to_string(),
        search: filter.search,
        notice: flash.notice.as_deref().and_then(notice_message),
        error: flash.error.as_deref().and_then(error_message),
    }
}

/// Create a draft course.
#[instrument(skip_all, fields(title = %form.title))]
pub async fn create(
    _learner: Learner,
    State(state): State<AppState>,
    Form(form): Form<CourseForm>,
) -> Redirect {
    match state.shelf().create(form.into_draft()).await {
        Ok(_) => done("created"),
        Err(e) => failed(&e),
    }
}

/// Update a course's title, description and level.
#[instrument(skip(_learner, state, form))]
pub async fn update(
    _learner: Learner,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<CourseForm>,
) -> Redirect {
    let Some(id) = parse_id(&id) else {
        return failed(&ShelfError::NotFound(CourseId::new(0)));
    };
    match state.shelf().update(id, form.into_draft()).await {
        Ok(_) => done("updated"),
        Err(e) => failed(&e),
    }
}

/// Flip a course between draft and published.
#[instrument(skip(_learner, state))]
pub async fn toggle_publish(
    _learner: Learner,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Redirect {
    let Some(id) = parse_id(&id) else {
        return failed(&ShelfError::NotFound(CourseId::new(0)));
    };
    match state.shelf().toggle_publish(id).await {
        Ok(s) if s.is_published() => done("published"),
        Ok(_) => done("unpublished"),
        Err(e) => failed(&e),
    }
}

/// Remove a course from the shelf.
#[instrument(skip(_learner, state))]
pub async fn delete(
    _learner: Learner,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Redirect {
    let Some(id) = parse_id(&id) else {
        return failed(&ShelfError::NotFound(CourseId::new(0)));
    };
    match state.shelf().delete(id).await {
        Ok(()) => done("deleted"),
        Err(e) => failed(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_defaults_unknown_level() {
        let form = CourseForm {
            title: "Robot Dance".to_string(),
            description: String::new(),
            level: "LEVEL_9".to_string(),
        };
        assert_eq!(form.into_draft().level, LevelId::Level1);
    }

    #[test]
    fn test_every_shelf_error_has_a_message() {
        for error in [ShelfError::MissingTitle, ShelfError::NotFound(CourseId::new(3))] {
            assert!(error_message(error_code(&error)).is_some());
        }
    }

    #[test]
    fn test_unknown_flash_codes_are_ignored() {
        assert_eq!(notice_message("<b>"), None);
        assert_eq!(error_message("boom"), None);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12"), Some(CourseId::new(12)));
        assert_eq!(parse_id("twelve"), None);
    }
}

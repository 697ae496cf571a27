//! Course catalog route handlers.
//!
//! The course detail page, the lesson viewer and lesson completion all apply
//! the level gate to the course, so a lesson URL cannot be used to skip a
//! locked course.

use askama::Template;
use askama_web::WebTemplate;
use atribot_core::catalog::{
    Course, CourseQuery, Lesson, LessonPosition, course_by_slug, lesson_position, lessons_for,
    sample_courses,
};
use atribot_core::gate::{LockState, lock_state, unlocked_courses};
use atribot_core::{LessonId, LevelId};
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{CourseCard, LevelView, parse_level_param};
use crate::content::render_markdown;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::Learner;
use crate::models::session::{completed_lessons, store_completed_lessons};

// =============================================================================
// Query Types
// =============================================================================

/// Course list filters.
#[derive(Debug, Deserialize)]
pub struct CourseListQuery {
    pub level: Option<String>,
    pub q: Option<String>,
}

// =============================================================================
// View Models
// =============================================================================

/// A level filter chip on the course list.
#[derive(Clone)]
pub struct LevelChip {
    pub level: LevelView,
    pub selected: bool,
}

/// A row in the course's lesson list.
#[derive(Clone)]
pub struct LessonItem {
    pub id: u32,
    pub number: usize,
    pub title: String,
    pub duration: String,
    pub completed: bool,
}

/// Neighbouring lesson link.
#[derive(Clone)]
pub struct LessonLink {
    pub id: u32,
    pub title: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Course list template.
#[derive(Template, WebTemplate)]
#[template(path = "courses/index.html")]
pub struct CoursesIndexTemplate {
    pub signed_in: bool,
    pub level: LevelView,
    pub chips: Vec<LevelChip>,
    pub all_selected: bool,
    pub search: String,
    pub courses: Vec<CourseCard>,
    /// Level to upgrade to; `None` at the top level.
    pub next_level: Option<LevelView>,
}

/// Course detail template.
#[derive(Template, WebTemplate)]
#[template(path = "courses/show.html")]
pub struct CourseShowTemplate {
    pub signed_in: bool,
    pub course: CourseCard,
    pub lessons: Vec<LessonItem>,
    pub first_lesson: Option<u32>,
    pub completed_count: usize,
}

/// Shown when the learner's level is below the course's.
#[derive(Template, WebTemplate)]
#[template(path = "courses/locked.html")]
pub struct CourseLockedTemplate {
    pub signed_in: bool,
    pub title: String,
    pub required: LevelView,
}

/// Shown for unknown course slugs and lesson ids.
#[derive(Template, WebTemplate)]
#[template(path = "courses/missing.html")]
pub struct CourseMissingTemplate {
    pub signed_in: bool,
    /// "Course" or "Lesson".
    pub what: &'static str,
}

/// Lesson viewer template.
#[derive(Template, WebTemplate)]
#[template(path = "courses/lesson.html")]
pub struct LessonTemplate {
    pub signed_in: bool,
    pub course_slug: String,
    pub course_title: String,
    pub lesson_id: u32,
    pub title: String,
    pub duration: String,
    pub content_html: String,
    pub number: usize,
    pub total: usize,
    pub previous: Option<LessonLink>,
    pub next: Option<LessonLink>,
    pub completed: bool,
    /// Every lesson of the course is completed.
    pub course_completed: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the courses unlocked at the learner's level.
#[instrument(skip_all)]
pub async fn index(
    Learner(learner): Learner,
    Query(query): Query<CourseListQuery>,
) -> impl IntoResponse {
    let level = learner.level();
    let filter = CourseQuery {
        level: parse_level_param(query.level.as_deref()),
        search: query.q.unwrap_or_default(),
    };

    let courses = unlocked_courses(sample_courses(), Some(level))
        .into_iter()
        .filter(|c| filter.matches(c))
        .map(|c| CourseCard::new(c, level))
        .collect();

    let chips = LevelId::ALL
        .iter()
        .map(|id| LevelChip {
            level: LevelView::new(id.info(), Some(level)),
            selected: filter.level == Some(*id),
        })
        .collect();

    CoursesIndexTemplate {
        signed_in: true,
        level: LevelView::new(level.info(), Some(level)),
        chips,
        all_selected: filter.level.is_none(),
        search: filter.search,
        courses,
        next_level: level.next().map(|next| LevelView::new(next.info(), Some(level))),
    }
}

/// Display a course, or the locked page if the learner's level is too low.
#[instrument(skip(learner, session))]
pub async fn show(
    Learner(learner): Learner,
    session: Session,
    Path(slug): Path<String>,
) -> Response {
    let level = learner.level();
    let course = match gated_course(&slug, level) {
        Ok(course) => course,
        Err(page) => return page,
    };

    let completed = completed_lessons(&session).await;
    let lessons: Vec<LessonItem> = lessons_for(course)
        .iter()
        .enumerate()
        .map(|(index, lesson)| LessonItem {
            id: lesson.id.get(),
            number: index + 1,
            title: lesson.title.clone(),
            duration: lesson.duration.clone(),
            completed: completed.contains(lesson),
        })
        .collect();

    CourseShowTemplate {
        signed_in: true,
        course: CourseCard::new(course, level),
        first_lesson: lessons.first().map(|l| l.id),
        completed_count: lessons.iter().filter(|l| l.completed).count(),
        lessons,
    }
    .into_response()
}

/// Display one lesson with previous/next navigation.
#[instrument(skip(learner, session))]
pub async fn lesson(
    Learner(learner): Learner,
    session: Session,
    Path((slug, lesson_id)): Path<(String, String)>,
) -> Response {
    let course = match gated_course(&slug, learner.level()) {
        Ok(course) => course,
        Err(page) => return page,
    };

    let lessons = lessons_for(course);
    let Some(position) = find_lesson(&lessons, &lesson_id) else {
        return missing("Lesson");
    };
    let completed = completed_lessons(&session).await;

    let link = |lesson: &Lesson| LessonLink {
        id: lesson.id.get(),
        title: lesson.title.clone(),
    };

    LessonTemplate {
        signed_in: true,
        course_slug: course.slug.clone(),
        course_title: course.title.clone(),
        lesson_id: position.lesson.id.get(),
        title: position.lesson.title.clone(),
        duration: position.lesson.duration.clone(),
        content_html: render_markdown(&position.lesson.content),
        number: position.number,
        total: position.total,
        previous: position.previous.map(link),
        next: position.next.map(link),
        completed: completed.contains(position.lesson),
        course_completed: lessons.iter().all(|l| completed.contains(l)),
    }
    .into_response()
}

/// Mark a lesson as completed and return to it.
#[instrument(skip(learner, session))]
pub async fn complete(
    Learner(learner): Learner,
    session: Session,
    Path((slug, lesson_id)): Path<(String, String)>,
) -> Result<Response> {
    let course = match gated_course(&slug, learner.level()) {
        Ok(course) => course,
        Err(page) => return Ok(page),
    };

    let lessons = lessons_for(course);
    let Some(position) = find_lesson(&lessons, &lesson_id) else {
        return Ok(missing("Lesson"));
    };

    let mut completed = completed_lessons(&session).await;
    if completed.mark(position.lesson) {
        store_completed_lessons(&session, &completed).await?;
        let lesson = position.lesson.id.to_string();
        tracing::info!(course = %course.slug, lesson = %lesson, "Lesson completed");
        add_breadcrumb(
            "progress",
            "Lesson completed",
            Some(&[("course", course.slug.as_str()), ("lesson", lesson.as_str())]),
        );
    }

    let url = format!("/courses/{}/lesson/{}", course.slug, position.lesson.id);
    Ok(Redirect::to(&url).into_response())
}

// =============================================================================
// Helpers
// =============================================================================

/// Look up `slug` and apply the level gate, or build the page to show instead.
fn gated_course(slug: &str, level: LevelId) -> std::result::Result<&'static Course, Response> {
    let Some(course) = course_by_slug(slug) else {
        return Err(missing("Course"));
    };

    match lock_state(course.level, Some(level)) {
        LockState::Unlocked => Ok(course),
        LockState::Locked => {
            tracing::info!(
                course = %course.slug,
                required = %course.level,
                current = %level,
                "Locked course requested"
            );
            Err((
                StatusCode::FORBIDDEN,
                CourseLockedTemplate {
                    signed_in: true,
                    title: course.title.clone(),
                    required: LevelView::new(course.level.info(), Some(level)),
                },
            )
                .into_response())
        }
    }
}

/// Parse `raw` and locate it among `lessons`.
fn find_lesson<'a>(lessons: &[&'a Lesson], raw: &str) -> Option<LessonPosition<'a>> {
    raw.parse::<LessonId>()
        .ok()
        .and_then(|id| lesson_position(lessons, id))
}

fn missing(what: &'static str) -> Response {
    (
        StatusCode::NOT_FOUND,
        CourseMissingTemplate {
            signed_in: true,
            what,
        },
    )
        .into_response()
}

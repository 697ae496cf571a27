//! Lesson completion and learner stats.
//!
//! Lesson ids repeat across courses, so a completed lesson is recorded as a
//! `(course, lesson)` pair.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{Course, Lesson, lessons_for};
use crate::types::{CourseId, LessonId};

/// Lessons the learner has marked as completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletedLessons(BTreeSet<(CourseId, LessonId)>);

impl CompletedLessons {
    #[must_use]
    pub fn contains(&self, lesson: &Lesson) -> bool {
        self.0.contains(&(lesson.course_id, lesson.id))
    }

    /// Record `lesson`. Returns `false` if it was already completed.
    pub fn mark(&mut self, lesson: &Lesson) -> bool {
        self.0.insert((lesson.course_id, lesson.id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Totals shown on the profile's stats card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    pub lessons_completed: usize,
    pub lessons_total: usize,
    /// Courses with at least one lesson, all of them completed.
    pub courses_completed: usize,
    /// Courses with lessons still to do.
    pub courses_remaining: usize,
    pub minutes_learned: u32,
    /// `lessons_completed` as a share of `lessons_total`, 0..=100.
    pub percent: u8,
}

/// Summarize progress over `courses`, usually the learner's unlocked ones.
///
/// Completed lessons from courses outside `courses` are ignored.
pub fn summarize<'a, I>(courses: I, completed: &CompletedLessons) -> ProgressSummary
where
    I: IntoIterator<Item = &'a Course>,
{
    let mut summary = ProgressSummary::default();

    for course in courses {
        let lessons = lessons_for(course);
        if lessons.is_empty() {
            continue;
        }

        let done: Vec<&Lesson> = lessons
            .iter()
            .copied()
            .filter(|l| completed.contains(l))
            .collect();

        summary.lessons_total += lessons.len();
        summary.lessons_completed += done.len();
        summary.minutes_learned += done.iter().map(|l| l.minutes()).sum::<u32>();
        if done.len() == lessons.len() {
            summary.courses_completed += 1;
        } else {
            summary.courses_remaining += 1;
        }
    }

    summary.percent = percent(summary.lessons_completed, summary.lessons_total);
    summary
}

fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    u8::try_from(part.min(whole) * 100 / whole).unwrap_or(100)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{course_by_slug, sample_courses};
    use crate::gate::unlocked_courses;
    use crate::types::LevelId;

    fn complete_course(completed: &mut CompletedLessons, slug: &str) {
        for lesson in lessons_for(course_by_slug(slug).unwrap()) {
            completed.mark(lesson);
        }
    }

    #[test]
    fn test_lesson_ids_are_scoped_to_their_course() {
        let hello = lessons_for(course_by_slug("hello-robot").unwrap());
        let blinky = lessons_for(course_by_slug("blinky-lights-and-buzzers").unwrap());
        let mut completed = CompletedLessons::default();

        assert!(completed.mark(hello[0]));
        assert!(!completed.mark(hello[0]));
        assert_eq!(hello[0].id, blinky[0].id);
        assert!(!completed.contains(blinky[0]));
        assert_eq!(completed.len(), 1);
    }

    #[test]
    fn test_fresh_learner_has_no_progress() {
        let courses = unlocked_courses(sample_courses(), Some(LevelId::Level1));
        let summary = summarize(courses, &CompletedLessons::default());
        assert_eq!(summary.lessons_completed, 0);
        assert_eq!(summary.courses_completed, 0);
        assert_eq!(summary.courses_remaining, 2);
        assert_eq!(summary.lessons_total, 7);
        assert_eq!(summary.percent, 0);
    }

    #[test]
    fn test_completed_course_counts_minutes_and_percent() {
        let mut completed = CompletedLessons::default();
        complete_course(&mut completed, "hello-robot");

        let courses = unlocked_courses(sample_courses(), Some(LevelId::Level1));
        let summary = summarize(courses, &completed);
        assert_eq!(summary.courses_completed, 1);
        assert_eq!(summary.courses_remaining, 1);
        assert_eq!(summary.lessons_completed, 4);
        assert_eq!(summary.minutes_learned, 55);
        assert_eq!(summary.percent, 57);
    }

    #[test]
    fn test_lessons_outside_the_given_courses_are_ignored() {
        let mut completed = CompletedLessons::default();
        complete_course(&mut completed, "robot-challenge-arena");

        let courses = unlocked_courses(sample_courses(), Some(LevelId::Level1));
        assert_eq!(summarize(courses, &completed).lessons_completed, 0);
    }

    #[test]
    fn test_serializes_as_pairs() {
        let mut completed = CompletedLessons::default();
        completed.mark(lessons_for(course_by_slug("gear-up").unwrap())[1]);
        let json = serde_json::to_string(&completed).unwrap();
        assert_eq!(json, "[[4,2]]");
        let back: CompletedLessons = serde_json::from_str(&json).unwrap();
        assert_eq!(back, completed);
    }
}

//! Level and course listing commands.

use atribot_core::catalog::sample_courses;
use atribot_core::gate::lock_state;
use atribot_core::{LEVELS, LevelId};

/// One line per level.
pub fn levels() -> String {
    LEVELS
        .iter()
        .map(|level| {
            format!(
                "{} {}  Level {}: {}",
                level.icon, level.id, level.number, level.name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per course; with a learner level, each line says whether it is open.
pub fn courses(learner: Option<LevelId>) -> String {
    sample_courses()
        .iter()
        .map(|course| {
            let line = format!(
                "{:<28} L{}  {:>2} lessons  {}",
                course.slug,
                course.level.number(),
                course.lessons_count,
                course.title
            );
            match learner {
                None => line,
                Some(_) if lock_state(course.level, learner).is_unlocked() => {
                    format!("{line}  [unlocked]")
                }
                Some(_) => format!("{line}  [locked]"),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

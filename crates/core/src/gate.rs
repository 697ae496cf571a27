//! Level gate.
//!
//! Content is unlocked iff its required level ranks at or below the learner's
//! level. A learner without a stored level is treated as level 1.

use serde::Serialize;

use crate::catalog::Course;
use crate::types::LevelId;

/// Whether an item is visible to the current learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    Unlocked,
    Locked,
}

impl LockState {
    #[must_use]
    pub const fn is_unlocked(self) -> bool {
        matches!(self, Self::Unlocked)
    }
}

/// The level used for gating when the session may not carry one.
#[must_use]
pub fn effective_level(current: Option<LevelId>) -> LevelId {
    current.unwrap_or_default()
}

/// `true` iff `required` ranks at or below the learner's level.
#[must_use]
pub fn is_unlocked(required: LevelId, current: Option<LevelId>) -> bool {
    required.number() <= effective_level(current).number()
}

/// [`is_unlocked`] as a [`LockState`].
#[must_use]
pub fn lock_state(required: LevelId, current: Option<LevelId>) -> LockState {
    if is_unlocked(required, current) {
        LockState::Unlocked
    } else {
        LockState::Locked
    }
}

/// Courses the learner may open, in catalog order.
pub fn unlocked_courses<'a, I>(courses: I, current: Option<LevelId>) -> Vec<&'a Course>
where
    I: IntoIterator<Item = &'a Course>,
{
    courses
        .into_iter()
        .filter(|course| is_unlocked(course.level, current))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_courses;

    #[test]
    fn test_gate_matches_rank_comparison() {
        for required in LevelId::ALL {
            for current in LevelId::ALL {
                assert_eq!(
                    is_unlocked(required, Some(current)),
                    required.number() <= current.number(),
                    "required {required}, current {current}"
                );
            }
        }
    }

    #[test]
    fn test_same_level_is_unlocked() {
        assert!(is_unlocked(LevelId::Level3, Some(LevelId::Level3)));
        assert_eq!(
            lock_state(LevelId::Level3, Some(LevelId::Level3)),
            LockState::Unlocked
        );
    }

    #[test]
    fn test_missing_level_defaults_to_level_one() {
        assert_eq!(effective_level(None), LevelId::Level1);
        assert!(is_unlocked(LevelId::Level1, None));
        for required in &LevelId::ALL[1..] {
            assert_eq!(lock_state(*required, None), LockState::Locked);
        }
    }

    #[test]
    fn test_fresh_session_sees_only_level_one_courses() {
        let visible = unlocked_courses(sample_courses(), None);
        assert!(!visible.is_empty());
        assert!(visible.iter().all(|c| c.level == LevelId::Level1));
    }

    #[test]
    fn test_level_three_sees_levels_one_to_three() {
        let visible = unlocked_courses(sample_courses(), Some(LevelId::Level3));
        assert!(visible.iter().all(|c| c.level.number() <= 3));
        for level in [LevelId::Level1, LevelId::Level2, LevelId::Level3] {
            assert!(visible.iter().any(|c| c.level == level));
        }
        let hidden = sample_courses().len() - visible.len();
        assert_eq!(
            hidden,
            sample_courses().iter().filter(|c| c.level.number() > 3).count()
        );
    }
}

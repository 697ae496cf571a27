//! Learner session state.
//!
//! The level and sign-in keys keep the names the site has always used, so a
//! session written by one release is readable by the next. Lesson progress
//! and profile settings live in the same session and go away on logout.

use atribot_core::LevelId;
use atribot_core::progress::CompletedLessons;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

/// Session keys for learner state.
pub mod keys {
    /// Unlocked level identifier (`LEVEL_1` .. `LEVEL_5`).
    pub const USER_LEVEL: &str = "atribot_user_level";

    /// `"true"` while signed in; absent otherwise.
    pub const IS_AUTHENTICATED: &str = "atribot_is_authenticated";

    /// Level accepted by the activation form but not yet confirmed with "continue".
    pub const PENDING_LEVEL: &str = "atribot_pending_level";

    /// Completed `(course, lesson)` pairs.
    pub const COMPLETED_LESSONS: &str = "atribot_completed_lessons";

    /// Display name chosen on the profile page.
    pub const DISPLAY_NAME: &str = "atribot_display_name";

    /// Email chosen on the profile page.
    pub const EMAIL: &str = "atribot_email";
}

/// Display name until the learner picks one.
pub const DEFAULT_NAME: &str = "Explorer";

/// Email until the learner picks one.
pub const DEFAULT_EMAIL: &str = "explorer@atribot.in";

/// Value stored under [`keys::IS_AUTHENTICATED`].
const AUTHENTICATED_FLAG: &str = "true";

/// Snapshot of the learner's session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerSession {
    pub level: Option<LevelId>,
    pub authenticated: bool,
}

impl LearnerSession {
    /// An authenticated session at `level`.
    #[must_use]
    pub const fn signed_in(level: LevelId) -> Self {
        Self {
            level: Some(level),
            authenticated: true,
        }
    }

    /// Read the session. Missing or unreadable keys are treated as absent.
    pub async fn load(session: &Session) -> Self {
        let level = session
            .get::<LevelId>(keys::USER_LEVEL)
            .await
            .ok()
            .flatten();
        let authenticated = session
            .get::<String>(keys::IS_AUTHENTICATED)
            .await
            .ok()
            .flatten()
            .is_some_and(|flag| flag == AUTHENTICATED_FLAG);

        Self {
            level,
            authenticated,
        }
    }

    /// Persist both keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn store(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        match self.level {
            Some(level) => session.insert(keys::USER_LEVEL, level).await?,
            None => {
                session.remove::<LevelId>(keys::USER_LEVEL).await?;
            }
        }
        if self.authenticated {
            session
                .insert(keys::IS_AUTHENTICATED, AUTHENTICATED_FLAG)
                .await?;
        } else {
            session.remove::<String>(keys::IS_AUTHENTICATED).await?;
        }
        Ok(())
    }

    /// Remove both keys and any pending activation (logout).
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn clear(session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.remove::<LevelId>(keys::USER_LEVEL).await?;
        session.remove::<String>(keys::IS_AUTHENTICATED).await?;
        session.remove::<LevelId>(keys::PENDING_LEVEL).await?;
        session
            .remove::<CompletedLessons>(keys::COMPLETED_LESSONS)
            .await?;
        session.remove::<String>(keys::DISPLAY_NAME).await?;
        session.remove::<String>(keys::EMAIL).await?;
        Ok(())
    }
}

/// Name and email shown on the profile and dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnerProfile {
    pub name: String,
    pub email: String,
}

impl Default for LearnerProfile {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_owned(),
            email: DEFAULT_EMAIL.to_owned(),
        }
    }
}

impl LearnerProfile {
    /// Read the profile, falling back to the defaults per field.
    pub async fn load(session: &Session) -> Self {
        let defaults = Self::default();
        let name = session
            .get::<String>(keys::DISPLAY_NAME)
            .await
            .ok()
            .flatten()
            .unwrap_or(defaults.name);
        let email = session
            .get::<String>(keys::EMAIL)
            .await
            .ok()
            .flatten()
            .unwrap_or(defaults.email);
        Self { name, email }
    }

    /// Persist both fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn store(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(keys::DISPLAY_NAME, &self.name).await?;
        session.insert(keys::EMAIL, &self.email).await
    }
}

/// Lessons completed in this session. Unreadable data counts as none.
pub async fn completed_lessons(session: &Session) -> CompletedLessons {
    session
        .get::<CompletedLessons>(keys::COMPLETED_LESSONS)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Replace the completed lessons.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn store_completed_lessons(
    session: &Session,
    completed: &CompletedLessons,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::COMPLETED_LESSONS, completed).await
}

/// Remember a level accepted by the activation form.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_pending_level(
    session: &Session,
    level: LevelId,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::PENDING_LEVEL, level).await
}

/// Take the pending level, removing it from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn take_pending_level(
    session: &Session,
) -> Result<Option<LevelId>, tower_sessions::session::Error> {
    session.remove::<LevelId>(keys::PENDING_LEVEL).await
}

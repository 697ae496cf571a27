//! Kit-activation state machine.
//!
//! ```text
//! Idle ──submit──▶ Submitting ──hit──▶ Accepted(level)   (terminal)
//!   ▲                   │
//!   │                 miss
//!   │                   ▼
//!   └─────────────── Rejected ──submit──▶ Submitting
//! ```
//!
//! A submit whose formatted key is not canonical leaves the state untouched
//! and reports a format error. There is no cancellation: once `Submitting`
//! begins, only [`ActivationFlow::resolve`] leaves it.

use crate::admission::AdmissionError;
use crate::types::{LevelId, LicenseKey, LicenseKeyError};

/// Why the last submission was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// The key is not in the admission table (or was already redeemed).
    InvalidOrUsed,
}

impl RejectionReason {
    /// Inline message shown under the key field.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidOrUsed => {
                "Invalid or already used license key. Please check and try again."
            }
        }
    }
}

/// States of the activation screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationState {
    #[default]
    Idle,
    Submitting,
    Rejected(RejectionReason),
    Accepted(LevelId),
}

/// Errors from driving the state machine.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ActivationError {
    /// The key does not have 16 characters; no transition happened.
    #[error("Please enter a valid 16-character license key")]
    Format(#[from] LicenseKeyError),

    /// A submission is already in flight.
    #[error("activation already in progress")]
    Busy,

    /// The flow already accepted a key.
    #[error("kit already activated")]
    AlreadyAccepted,

    /// `resolve` was called without a pending submission.
    #[error("no activation in progress")]
    NotSubmitting,
}

/// One activation attempt sequence for a single form.
#[derive(Debug, Clone, Default)]
pub struct ActivationFlow {
    state: ActivationState,
}

impl ActivationFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> ActivationState {
        self.state
    }

    /// Submit raw key text.
    ///
    /// On success the flow enters `Submitting` and the canonical key is
    /// returned for the admission call.
    ///
    /// # Errors
    ///
    /// - [`ActivationError::Format`] if the key is not canonical; state unchanged.
    /// - [`ActivationError::Busy`] while `Submitting`.
    /// - [`ActivationError::AlreadyAccepted`] once `Accepted`.
    pub fn submit(&mut self, raw: &str) -> Result<LicenseKey, ActivationError> {
        match self.state {
            ActivationState::Submitting => return Err(ActivationError::Busy),
            ActivationState::Accepted(_) => return Err(ActivationError::AlreadyAccepted),
            ActivationState::Idle | ActivationState::Rejected(_) => {}
        }

        let key = LicenseKey::parse(raw)?;
        self.state = ActivationState::Submitting;
        Ok(key)
    }

    /// Apply the admission outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError::NotSubmitting`] if no submission is pending.
    pub fn resolve(
        &mut self,
        outcome: Result<LevelId, AdmissionError>,
    ) -> Result<ActivationState, ActivationError> {
        if self.state != ActivationState::Submitting {
            return Err(ActivationError::NotSubmitting);
        }

        self.state = match outcome {
            Ok(level) => ActivationState::Accepted(level),
            // Malformed keys never reach admission through `submit`, but an
            // authority may still report one.
            Err(AdmissionError::InvalidOrUsed | AdmissionError::Malformed(_)) => {
                ActivationState::Rejected(RejectionReason::InvalidOrUsed)
            }
        };
        Ok(self.state)
    }

    /// The level to persist when the learner continues.
    #[must_use]
    pub const fn accepted_level(&self) -> Option<LevelId> {
        match self.state {
            ActivationState::Accepted(level) => Some(level),
            _ => None,
        }
    }
}

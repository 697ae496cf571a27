//! Session-held models.

pub mod session;

pub use session::{LearnerProfile, LearnerSession, keys as session_keys};

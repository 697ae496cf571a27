//! Core types for Atribot.
//!
//! This module provides type-safe wrappers for levels, license keys, ids and
//! statuses.

pub mod id;
pub mod level;
pub mod license_key;
pub mod status;

pub use id::*;
pub use level::{LEVELS, Level, LevelId, UnknownLevel};
pub use license_key::{LicenseKey, LicenseKeyError, format_license_key};
pub use status::*;

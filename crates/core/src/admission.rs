//! License-key admission.
//!
//! Admission maps a canonical key to the level it unlocks. The demo table is
//! fixed at compile time; there is no issuance service and no record of which
//! keys have been redeemed, so "invalid" and "already used" are reported as one
//! outcome.

use crate::types::{LevelId, LicenseKey, LicenseKeyError};

/// Why a key was not admitted.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    /// The key does not have the canonical 16-character shape. Raised before
    /// any lookup happens.
    #[error("malformed key: {0}")]
    Malformed(#[from] LicenseKeyError),

    /// The key is well formed but not in the table.
    #[error("invalid or already used license key")]
    InvalidOrUsed,
}

/// The pre-seeded demo keys, one per level.
const DEMO_KEYS: [(&str, LevelId); 5] = [
    ("AB12-CD34-EF56-GH01", LevelId::Level1),
    ("AB12-CD34-EF56-GH02", LevelId::Level2),
    ("AB12-CD34-EF56-GH03", LevelId::Level3),
    ("AB12-CD34-EF56-GH04", LevelId::Level4),
    ("AB12-CD34-EF56-GH05", LevelId::Level5),
];

/// Fixed lookup table of keys accepted in demo deployments.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoKeyTable;

impl DemoKeyTable {
    /// Look up a canonical key.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::InvalidOrUsed`] when the key is not in the
    /// table.
    pub fn admit(self, key: &LicenseKey) -> Result<LevelId, AdmissionError> {
        DEMO_KEYS
            .iter()
            .find(|(demo, _)| *demo == key.as_str())
            .map(|(_, level)| *level)
            .ok_or(AdmissionError::InvalidOrUsed)
    }

    /// All demo keys with their levels, lowest level first.
    pub fn entries(self) -> impl Iterator<Item = (&'static str, LevelId)> {
        DEMO_KEYS.into_iter()
    }
}

/// Normalize raw input and admit it against the demo table.
///
/// The length precondition is evaluated first, so short input yields
/// [`AdmissionError::Malformed`] and never reaches the table.
///
/// # Errors
///
/// Returns [`AdmissionError::Malformed`] or [`AdmissionError::InvalidOrUsed`].
pub fn check_license_key(raw: &str) -> Result<LevelId, AdmissionError> {
    let key = LicenseKey::parse(raw)?;
    DemoKeyTable.admit(&key)
}

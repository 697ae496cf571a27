//! Kit license keys.
//!
//! Keys printed on kit cards have the canonical shape `XXXX-XXXX-XXXX-XXXX`:
//! four groups of four uppercase alphanumerics. Learners type them in any
//! case and with any separators, so input is normalized with
//! [`format_license_key`] before it is checked.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of characters in one group.
const GROUP_LEN: usize = 4;

/// Number of groups in a canonical key.
const GROUP_COUNT: usize = 4;

/// Characters used when generating new keys.
const KEY_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Errors that can occur when parsing a [`LicenseKey`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LicenseKeyError {
    /// The normalized input is not 19 characters long.
    #[error("license key must have 16 characters, got {alphanumerics}")]
    Malformed {
        /// Alphanumeric characters left after normalization (capped at 16).
        alphanumerics: usize,
    },
}

/// Normalize free text into the canonical key shape.
///
/// Strips everything outside `[A-Za-z0-9]`, uppercases the rest and groups it
/// into chunks of four joined by `-`. At most four groups are kept; surplus
/// input is dropped. Short input yields a partial key, never an error.
///
/// ```
/// use atribot_core::format_license_key;
///
/// assert_eq!(format_license_key("ab12 cd34/ef56.gh01"), "AB12-CD34-EF56-GH01");
/// assert_eq!(format_license_key("ab1"), "AB1");
/// assert_eq!(format_license_key("abcd1234abcd1234XYZ"), "ABCD-1234-ABCD-1234");
/// ```
#[must_use]
pub fn format_license_key(input: &str) -> String {
    let cleaned: Vec<char> = input
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .take(GROUP_LEN * GROUP_COUNT)
        .collect();

    cleaned
        .chunks(GROUP_LEN)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("-")
}

/// A license key in canonical `XXXX-XXXX-XXXX-XXXX` form.
///
/// The only ways to build one are [`LicenseKey::parse`] and
/// [`LicenseKey::generate`], so a value of this type always has length 19.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LicenseKey(String);

impl LicenseKey {
    /// Length of a canonical key: 16 alphanumerics and 3 hyphens.
    pub const CANONICAL_LEN: usize = GROUP_LEN * GROUP_COUNT + GROUP_COUNT - 1;

    /// Normalize `input` and accept it only if it reaches the canonical length.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseKeyError::Malformed`] when fewer than 16 alphanumerics
    /// survive normalization.
    pub fn parse(input: &str) -> Result<Self, LicenseKeyError> {
        let formatted = format_license_key(input);
        if formatted.len() == Self::CANONICAL_LEN {
            Ok(Self(formatted))
        } else {
            Err(LicenseKeyError::Malformed {
                alphanumerics: formatted.chars().filter(char::is_ascii_alphanumeric).count(),
            })
        }
    }

    /// Draw a fresh random key from `A-Z0-9`.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let raw: String = (0..GROUP_LEN * GROUP_COUNT)
            .map(|_| {
                let index = rng.random_range(0..KEY_ALPHABET.len());
                KEY_ALPHABET.get(index).map_or('A', |b| char::from(*b))
            })
            .collect();
        Self(format_license_key(&raw))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LicenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for LicenseKey {
    type Err = LicenseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LicenseKey {
    type Error = LicenseKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LicenseKey> for String {
    fn from(key: LicenseKey) -> Self {
        key.0
    }
}

impl AsRef<str> for LicenseKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

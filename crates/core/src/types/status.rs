//! Status enums for admin-side records.

use serde::{Deserialize, Serialize};

/// Whether a license key has been handed out.
///
/// Display-only: nothing in the admission path consults this flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeyStatus {
    #[default]
    Available,
    Used,
}

impl KeyStatus {
    /// Build from the record's `used` flag.
    #[must_use]
    pub const fn from_used(used: bool) -> Self {
        if used { Self::Used } else { Self::Available }
    }

    /// Label shown in tables and the CSV export.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Used => "Used",
        }
    }
}

impl std::fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "unused"),
            Self::Used => write!(f, "used"),
        }
    }
}

impl std::str::FromStr for KeyStatus {
    type Err = String;

    /// Accepts the filter values used by the admin license page.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "used" => Ok(Self::Used),
            "unused" | "available" => Ok(Self::Available),
            _ => Err(format!("invalid key status: {s}")),
        }
    }
}

/// Publication state of a course in the admin shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PublishState {
    #[default]
    Draft,
    Published,
}

impl PublishState {
    /// The other state.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Draft => Self::Published,
            Self::Published => Self::Draft,
        }
    }

    #[must_use]
    pub const fn is_published(self) -> bool {
        matches!(self, Self::Published)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_key_status_roundtrip() {
        for status in [KeyStatus::Available, KeyStatus::Used] {
            assert_eq!(status.to_string().parse::<KeyStatus>().unwrap(), status);
        }
        assert!("ALL".parse::<KeyStatus>().is_err());
    }

    #[test]
    fn test_publish_toggle() {
        assert_eq!(PublishState::Draft.toggled(), PublishState::Published);
        assert!(PublishState::Draft.toggled().is_published());
        assert!(!PublishState::Published.toggled().is_published());
    }
}

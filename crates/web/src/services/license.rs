//! License-key admission.
//!
//! Handlers never consult the demo key table directly; they go through a
//! [`LicenseAuthority`] so that a deployment backed by a real issuing service
//! only has to swap the implementation held in `AppState`.

use std::time::Duration;

use async_trait::async_trait;
use atribot_core::LevelId;
use atribot_core::LicenseKey;
use atribot_core::admission::{AdmissionError, DemoKeyTable};
use tracing::instrument;

/// Capability to check a kit license key.
#[async_trait]
pub trait LicenseAuthority: Send + Sync {
    /// Resolve `key` to the level it unlocks.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::InvalidOrUsed`] when the key is unknown.
    async fn check(&self, key: &LicenseKey) -> Result<LevelId, AdmissionError>;
}

/// Authority backed by the fixed demo key table.
///
/// Every check waits `latency` before answering, whatever the outcome.
#[derive(Debug, Clone, Default)]
pub struct DemoLicenseAuthority {
    table: DemoKeyTable,
    latency: Duration,
}

impl DemoLicenseAuthority {
    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self {
            table: DemoKeyTable,
            latency,
        }
    }
}

#[async_trait]
impl LicenseAuthority for DemoLicenseAuthority {
    #[instrument(skip(self), fields(key = %key))]
    async fn check(&self, key: &LicenseKey) -> Result<LevelId, AdmissionError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let outcome = self.table.admit(key);
        match &outcome {
            Ok(level) => tracing::info!(level = %level, "License key admitted"),
            Err(e) => tracing::info!(reason = %e, "License key rejected"),
        }
        outcome
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn key(raw: &str) -> LicenseKey {
        LicenseKey::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_admits_demo_keys() {
        let authority = DemoLicenseAuthority::new(Duration::ZERO);
        assert_eq!(
            authority.check(&key("AB12-CD34-EF56-GH01")).await,
            Ok(LevelId::Level1)
        );
        assert_eq!(
            authority.check(&key("AB12-CD34-EF56-GH05")).await,
            Ok(LevelId::Level5)
        );
    }

    #[tokio::test]
    async fn test_rejects_unknown_key() {
        let authority = DemoLicenseAuthority::new(Duration::ZERO);
        assert_eq!(
            authority.check(&key("ZZZZ-ZZZZ-ZZZZ-ZZZZ")).await,
            Err(AdmissionError::InvalidOrUsed)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_waits_for_latency() {
        let authority = DemoLicenseAuthority::new(Duration::from_millis(1500));
        let started = tokio::time::Instant::now();

        let outcome = authority.check(&key("AB12-CD34-EF56-GH03")).await;

        assert_eq!(outcome, Ok(LevelId::Level3));
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_also_waits() {
        let authority = DemoLicenseAuthority::new(Duration::from_millis(1500));
        let started = tokio::time::Instant::now();

        assert!(authority.check(&key("ZZZZ-ZZZZ-ZZZZ-ZZZZ")).await.is_err());
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }
}

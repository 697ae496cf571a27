//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::WebConfig;
use crate::services::{
    AccountGateway, CourseShelf, DemoAccountGateway, DemoLicenseAuthority, KeyInventory,
    LicenseAuthority,
};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the capability services and the back-office stores.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    licenses: Arc<dyn LicenseAuthority>,
    accounts: Arc<dyn AccountGateway>,
    inventory: KeyInventory,
    shelf: CourseShelf,
}

impl AppState {
    /// Create state with the demo services, using the latencies from `config`.
    #[must_use]
    pub fn new(config: WebConfig) -> Self {
        let licenses = Arc::new(DemoLicenseAuthority::new(config.activation_delay));
        let accounts = Arc::new(DemoAccountGateway::new(config.auth_delay));
        Self::with_services(config, licenses, accounts)
    }

    /// Create state with explicit service implementations.
    ///
    /// # Arguments
    ///
    /// * `config` - Site configuration
    /// * `licenses` - License-key admission service
    /// * `accounts` - Login and signup service
    #[must_use]
    pub fn with_services(
        config: WebConfig,
        licenses: Arc<dyn LicenseAuthority>,
        accounts: Arc<dyn AccountGateway>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                licenses,
                accounts,
                inventory: KeyInventory::seeded(),
                shelf: CourseShelf::seeded(),
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get the license-key admission service.
    #[must_use]
    pub fn licenses(&self) -> &dyn LicenseAuthority {
        self.inner.licenses.as_ref()
    }

    /// Get the account service.
    #[must_use]
    pub fn accounts(&self) -> &dyn AccountGateway {
        self.inner.accounts.as_ref()
    }

    /// Get the back-office license key inventory.
    #[must_use]
    pub fn inventory(&self) -> &KeyInventory {
        &self.inner.inventory
    }

    /// Get the back-office course shelf.
    #[must_use]
    pub fn shelf(&self) -> &CourseShelf {
        &self.inner.shelf
    }
}

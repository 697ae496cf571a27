//! Swapping the license authority behind the activation form.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use async_trait::async_trait;
use atribot_core::admission::AdmissionError;
use atribot_core::{LevelId, LicenseKey};
use atribot_integration_tests::TestSite;
use atribot_web::config::WebConfig;
use atribot_web::services::{DemoAccountGateway, LicenseAuthority};
use atribot_web::state::AppState;
use axum::http::StatusCode;

/// Admits only keys starting with `ENG4`, at level 4.
struct WarehouseAuthority;

#[async_trait]
impl LicenseAuthority for WarehouseAuthority {
    async fn check(&self, key: &LicenseKey) -> Result<LevelId, AdmissionError> {
        if key.as_str().starts_with("ENG4") {
            Ok(LevelId::Level4)
        } else {
            Err(AdmissionError::InvalidOrUsed)
        }
    }
}

fn warehouse_site() -> TestSite {
    let config = WebConfig::for_tests();
    let accounts = Arc::new(DemoAccountGateway::new(config.auth_delay));
    TestSite::with_state(AppState::with_services(
        config,
        Arc::new(WarehouseAuthority),
        accounts,
    ))
}

#[tokio::test]
async fn test_custom_authority_decides_admission() {
    let mut site = warehouse_site();

    // A demo key means nothing to this authority.
    let rejected = site
        .post_form("/kit_activation", &[("key", "AB12-CD34-EF56-GH01")])
        .await;
    assert_eq!(rejected.status, StatusCode::UNPROCESSABLE_ENTITY);

    site.activate("eng4-0000-1111-2222").await;
    let courses = site.get("/courses").await;
    assert!(courses.body.contains("/courses/code-your-robot"));
    assert!(!courses.body.contains("/courses/robot-challenge-arena"));
}

#[tokio::test]
async fn test_format_errors_never_reach_the_authority() {
    let mut site = warehouse_site();
    let response = site.post_form("/kit_activation", &[("key", "ENG4")]).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        response
            .body
            .contains("Please enter a valid 16-character license key")
    );
}

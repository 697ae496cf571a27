//! Public pages and cross-cutting middleware.

#![allow(clippy::unwrap_used)]

use atribot_integration_tests::TestSite;
use axum::http::StatusCode;

#[tokio::test]
async fn test_health() {
    let mut site = TestSite::new();
    let response = site.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_landing_page_lists_levels() {
    let mut site = TestSite::new();
    let page = site.get("/").await;

    assert_eq!(page.status, StatusCode::OK);
    for name in ["Starter Bot", "Gear Builder", "Robot Explorer", "Circuit Master", "Atribot Pro"] {
        assert!(page.body.contains(name), "{name}");
    }
    assert!(page.body.contains("href=\"/kit_activation\""));
}

#[tokio::test]
async fn test_navigation_follows_sign_in() {
    let mut site = TestSite::new();
    let anonymous = site.get("/").await;
    assert!(anonymous.body.contains("Activate Kit"));
    assert!(!anonymous.body.contains("action=\"/logout\""));

    site.activate("AB12-CD34-EF56-GH01").await;
    let signed_in = site.get("/").await;
    assert!(signed_in.body.contains("action=\"/logout\""));
    assert!(signed_in.body.contains("Go to Dashboard"));
}

#[tokio::test]
async fn test_unknown_path_renders_not_found_page() {
    let mut site = TestSite::new();
    let page = site.get("/no-such-page").await;

    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert!(page.body.contains("/no-such-page"));
    assert!(page.body.contains("Return to Home"));
}

#[tokio::test]
async fn test_security_headers_on_pages() {
    let mut site = TestSite::new();
    let page = site.get("/").await;

    assert_eq!(page.header("x-frame-options"), Some("DENY"));
    assert_eq!(page.header("x-content-type-options"), Some("nosniff"));
    assert_eq!(page.header("cache-control"), Some("no-store, max-age=0"));
    assert!(
        page.header("content-security-policy")
            .unwrap()
            .contains("script-src 'self'")
    );
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let mut site = TestSite::new();
    let page = site.get("/health").await;

    let id = page.header("x-request-id").unwrap();
    assert_eq!(id.len(), 36);
}

#[tokio::test]
async fn test_static_assets_are_served() {
    let mut site = TestSite::new();
    let css = site.get("/static/css/app.css").await;

    assert_eq!(css.status, StatusCode::OK);
    assert!(css.header("content-type").unwrap().starts_with("text/css"));
    assert_eq!(css.header("cache-control"), None);
}

#[tokio::test]
async fn test_contact_form() {
    let mut site = TestSite::new();

    let form = site.get("/contact").await;
    assert_eq!(form.status, StatusCode::OK);

    let invalid = site
        .post_form(
            "/contact",
            &[("name", "Asha"), ("email", "nope"), ("message", "Hi!")],
        )
        .await;
    assert_eq!(invalid.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(invalid.body.contains("Please enter a valid email address."));
    assert!(invalid.body.contains("Hi!"));

    let sent = site
        .post_form(
            "/contact",
            &[
                ("name", "Asha"),
                ("email", "asha@example.com"),
                ("message", "Where is my level 2 kit?"),
            ],
        )
        .await;
    assert_eq!(sent.status, StatusCode::OK);
    assert!(sent.body.contains("get back to you soon"));
}

//! Integration tests for the Atribot site.
//!
//! Tests drive the full [`atribot_web::app`] router in-process, one request
//! at a time, with the session cookie carried between requests the way a
//! browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p atribot-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let mut site = TestSite::new();
//! site.activate("AB12-CD34-EF56-GH03").await;
//! let page = site.get("/courses").await;
//! assert_eq!(page.status, StatusCode::OK);
//! ```

use atribot_web::{app, config::WebConfig, state::AppState};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use tower::ServiceExt;

/// Name of the session cookie set by the site.
pub const SESSION_COOKIE: &str = "atribot_session";

/// Largest body the helpers will read.
const BODY_LIMIT: usize = 4 * 1024 * 1024;

/// A response with its body collected as text.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// A header value as text.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// One browser talking to one in-process site.
pub struct TestSite {
    router: Router,
    cookie: Option<String>,
}

impl Default for TestSite {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSite {
    /// A fresh site with seeded stores and zero simulated latency.
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(AppState::new(WebConfig::for_tests()))
    }

    #[must_use]
    pub fn with_state(state: AppState) -> Self {
        Self {
            router: app(state),
            cookie: None,
        }
    }

    /// Whether the browser currently holds a session cookie.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    /// Send a GET request.
    ///
    /// # Panics
    ///
    /// Panics if the router fails, which the site never does.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(Method::GET, path, None).await
    }

    /// Send a form POST.
    ///
    /// # Panics
    ///
    /// Panics if the router fails, which the site never does.
    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.send(Method::POST, path, Some(body)).await
    }

    /// Activate a kit and press "continue", leaving the browser signed in.
    ///
    /// # Panics
    ///
    /// Panics if the key is rejected.
    pub async fn activate(&mut self, key: &str) {
        let page = self.post_form("/kit_activation", &[("key", key)]).await;
        assert_eq!(page.status, StatusCode::OK, "activation of {key} failed");
        let done = self.post_form("/kit_activation/continue", &[]).await;
        assert_eq!(done.location(), Some("/dashboard"));
    }

    #[allow(clippy::unwrap_used)]
    async fn send(&mut self, method: Method, path: &str, form: Option<String>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, format!("{SESSION_COOKIE}={cookie}"));
        }
        let request = match form {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        self.remember_cookie(response.headers());

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    fn remember_cookie(&mut self, headers: &HeaderMap) {
        for value in headers.get_all(header::SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            let Some(pair) = value.split(';').next() else { continue };
            let Some((name, cookie)) = pair.split_once('=') else { continue };
            if name.trim() != SESSION_COOKIE {
                continue;
            }
            let removed = cookie.is_empty() || value.to_ascii_lowercase().contains("max-age=0");
            self.cookie = (!removed).then(|| cookie.to_string());
        }
    }
}

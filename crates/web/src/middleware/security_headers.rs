//! Security headers middleware.
//!
//! Every asset the site serves is self-hosted, so the policy stays locked
//! down to `'self'`.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue, header},
    middleware::Next,
    response::Response,
};

/// Content Security Policy applied to every response.
///
/// Lesson markdown is rendered with raw HTML escaped, and the only script is
/// `/static/js/app.js`, so no inline script or style is ever allowed.
pub const CONTENT_SECURITY_POLICY_VALUE: &str = "default-src 'none'; \
     script-src 'self'; \
     style-src 'self'; \
     img-src 'self' data:; \
     font-src 'self'; \
     connect-src 'self'; \
     object-src 'none'; \
     base-uri 'self'; \
     form-action 'self'; \
     frame-ancestors 'none'";

/// Browser features no Atribot page uses.
const PERMISSIONS_POLICY_VALUE: &str = "accelerometer=(), autoplay=(), camera=(), \
     display-capture=(), geolocation=(), gyroscope=(), magnetometer=(), \
     microphone=(), payment=(), usb=(), xr-spatial-tracking=()";

/// Learner pages depend on the session level, so they must never be reused.
const PAGE_CACHE_CONTROL: &str = "no-store, max-age=0";

/// Headers set on every response, pages and assets alike.
const ALWAYS: [(&str, &str); 8] = [
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "no-referrer"),
    ("content-security-policy", CONTENT_SECURITY_POLICY_VALUE),
    ("permissions-policy", PERMISSIONS_POLICY_VALUE),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("x-dns-prefetch-control", "off"),
];

/// Add security headers to all responses.
///
/// Static assets under `/static` keep whatever caching `ServeDir` chose.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let is_static = request.uri().path().starts_with("/static/");
    let mut response = next.run(request).await;
    apply_security_headers(response.headers_mut(), is_static);
    response
}

fn apply_security_headers(headers: &mut HeaderMap, is_static: bool) {
    for (name, value) in ALWAYS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    if !is_static {
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(PAGE_CACHE_CONTROL),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_are_not_cached() {
        let mut headers = HeaderMap::new();
        apply_security_headers(&mut headers, false);
        assert_eq!(
            headers.get(header::X_FRAME_OPTIONS),
            Some(&HeaderValue::from_static("DENY"))
        );
        assert_eq!(
            headers.get(header::CACHE_CONTROL),
            Some(&HeaderValue::from_static(PAGE_CACHE_CONTROL))
        );
        assert_eq!(
            headers.get(header::CONTENT_SECURITY_POLICY),
            Some(&HeaderValue::from_static(CONTENT_SECURITY_POLICY_VALUE))
        );
    }

    #[test]
    fn test_static_assets_keep_cache_headers() {
        let mut headers = HeaderMap::new();
        apply_security_headers(&mut headers, true);
        assert!(!headers.contains_key(header::CACHE_CONTROL));
        assert_eq!(headers.len(), ALWAYS.len());
    }

    #[test]
    fn test_existing_cache_header_is_replaced_on_pages() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("public"));
        apply_security_headers(&mut headers, false);
        assert_eq!(headers.get_all(header::CACHE_CONTROL).iter().count(), 1);
    }
}

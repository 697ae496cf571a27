//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with `request_id` and `learner_level` fields)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame options, etc.)
//! 5. Session layer (tower-sessions with in-memory store)
//! 6. Route guard (allow or redirect to kit activation)

pub mod guard;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use guard::{
    GuardDecision, Learner, LearnerContext, OptionalLearner, RouteAccess, decide,
    guard_middleware,
};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;

//! Centralized route guard.
//!
//! One middleware classifies each request path, reads the learner session
//! once and either lets the request through or redirects to kit activation.
//! Handlers never re-read the session to decide access; they take the
//! [`Learner`] or [`OptionalLearner`] extractor instead.

use atribot_core::LevelId;
use atribot_core::gate::effective_level;
use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::Span;

use crate::models::LearnerSession;

/// Where unauthenticated learners are sent.
pub const ACTIVATION_PATH: &str = "/kit_activation";

/// Path prefixes that need a signed-in learner.
const LEARNER_PREFIXES: &[&str] = &["/dashboard", "/courses", "/profile", "/admin"];

/// Who may see a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    Learner,
}

impl RouteAccess {
    /// Classify a request path.
    ///
    /// A prefix matches the path itself and anything below it, so
    /// `/courses` and `/courses/hello-robot` are guarded but `/coursesx` is not.
    #[must_use]
    pub fn for_path(path: &str) -> Self {
        let guarded = LEARNER_PREFIXES.iter().any(|prefix| {
            path.strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        });
        if guarded { Self::Learner } else { Self::Public }
    }
}

/// Outcome of the guard for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

/// Decide whether `session` may see a route with `access`.
#[must_use]
pub const fn decide(access: RouteAccess, session: &LearnerSession) -> GuardDecision {
    match access {
        RouteAccess::Public => GuardDecision::Allow,
        RouteAccess::Learner if session.authenticated => GuardDecision::Allow,
        RouteAccess::Learner => GuardDecision::Redirect(ACTIVATION_PATH),
    }
}

/// Signed-in learner attached to the request by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LearnerContext {
    /// Level stored in the session, if any.
    pub stored_level: Option<LevelId>,
}

impl LearnerContext {
    /// The level used for gating; level 1 when none is stored.
    #[must_use]
    pub fn level(&self) -> LevelId {
        effective_level(self.stored_level)
    }
}

/// Route guard middleware. Must run inside the session layer.
pub async fn guard_middleware(mut request: Request, next: Next) -> Response {
    let access = RouteAccess::for_path(request.uri().path());

    let session = request.extensions().get::<Session>().cloned();
    let learner = match session {
        Some(session) => LearnerSession::load(&session).await,
        None => LearnerSession::default(),
    };

    match decide(access, &learner) {
        GuardDecision::Redirect(to) => {
            tracing::debug!(path = %request.uri().path(), "Unauthenticated learner redirected");
            Redirect::to(to).into_response()
        }
        GuardDecision::Allow => {
            if learner.authenticated {
                let context = LearnerContext {
                    stored_level: learner.level,
                };
                Span::current().record("learner_level", context.level().as_str());
                request.extensions_mut().insert(context);
            }
            next.run(request).await
        }
    }
}

/// Extractor that requires a signed-in learner.
///
/// The guard has already redirected anonymous visitors on learner routes, so
/// the rejection only fires if a handler is mounted on a public path by
/// mistake.
///
/// # Example
///
/// ```rust,ignore
/// async fn dashboard(Learner(learner): Learner) -> impl IntoResponse {
///     format!("Level {}", learner.level().number())
/// }
/// ```
pub struct Learner(pub LearnerContext);

/// Rejection for [`Learner`]: send the visitor to kit activation.
pub struct LearnerRejection;

impl IntoResponse for LearnerRejection {
    fn into_response(self) -> Response {
        Redirect::to(ACTIVATION_PATH).into_response()
    }
}

impl<S> FromRequestParts<S> for Learner
where
    S: Send + Sync,
{
    type Rejection = LearnerRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<LearnerContext>()
            .copied()
            .map(Self)
            .ok_or(LearnerRejection)
    }
}

/// Extractor that optionally gets the signed-in learner.
pub struct OptionalLearner(pub Option<LearnerContext>);

impl<S> FromRequestParts<S> for OptionalLearner
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<LearnerContext>().copied()))
    }
}

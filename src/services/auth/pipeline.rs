use std::sync::Arc;

use axum::http::HeaderValue;
use tracing::{debug, info};

use super::authenticator::TokenAuthenticator;
use super::authority::AuthorityMatcher;
use super::principal::Principal;
use crate::error::AuthError;

/// Terminal outcome for one request. Exactly one per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision<P> {
    /// Continue; `None` means the request proceeds anonymously.
    Allowed(Option<P>),
    /// Valid principal without enough authority.
    Denied(AuthError),
    /// No usable credential on a path that needs one. Carries the original failure.
    Unauthorized(AuthError),
}

impl<P> AuthDecision<P> {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthDecision::Allowed(_))
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            AuthDecision::Allowed(Some(_)) => "allowed",
            AuthDecision::Allowed(None) => "allowed_anonymous",
            AuthDecision::Denied(_) => "denied",
            AuthDecision::Unauthorized(_) => "unauthorized",
        }
    }
}

/// Authenticate, then authorize against the rule for the request path.
pub struct AuthDecisionPipeline<P> {
    authenticator: TokenAuthenticator<P>,
    matcher: Arc<dyn AuthorityMatcher>,
}

impl<P> Clone for AuthDecisionPipeline<P> {
    fn clone(&self) -> Self {
        Self {
            authenticator: self.authenticator.clone(),
            matcher: self.matcher.clone(),
        }
    }
}

impl<P> std::fmt::Debug for AuthDecisionPipeline<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthDecisionPipeline")
            .field("authenticator", &self.authenticator)
            .finish_non_exhaustive()
    }
}

impl<P: Principal> AuthDecisionPipeline<P> {
    pub fn new(authenticator: TokenAuthenticator<P>, matcher: Arc<dyn AuthorityMatcher>) -> Self {
        Self {
            authenticator,
            matcher,
        }
    }

    pub fn authenticator(&self) -> &TokenAuthenticator<P> {
        &self.authenticator
    }

    pub fn decide(&self, path: &str, header: Option<&str>) -> AuthDecision<P> {
        self.resolve(path, self.authenticator.authenticate(header))
    }

    pub fn decide_header(&self, path: &str, header: Option<&HeaderValue>) -> AuthDecision<P> {
        self.resolve(path, self.authenticator.authenticate_header(header))
    }

    fn resolve(&self, path: &str, authenticated: Result<P, AuthError>) -> AuthDecision<P> {
        let rule = self.matcher.match_path(path);

        let decision = match authenticated {
            Ok(principal) => {
                if rule.asserts(Some(&principal)) {
                    AuthDecision::Allowed(Some(principal))
                } else {
                    AuthDecision::Denied(AuthError::Denied)
                }
            }
            Err(cause) => {
                // Only the two authentication kinds reach here; anything else
                // is folded into InvalidToken.
                let cause = match cause {
                    AuthError::Unauthorized => AuthError::Unauthorized,
                    _ => AuthError::InvalidToken,
                };

                if rule.asserts::<P>(None) {
                    debug!(path, cause = cause.code(), "continuing anonymously");
                    AuthDecision::Allowed(None)
                } else {
                    AuthDecision::Unauthorized(cause)
                }
            }
        };

        if !decision.is_allowed() {
            info!(path, rule = %rule.rule(), outcome = decision.outcome(), "request rejected");
        }

        decision
    }
}

//! Access middleware: bearer token → principal → authority check → dispatch.
//!
//! - Allowed: the principal (if any) goes into request extensions, keyed by
//!   its type, and the request continues.
//! - Denied / Unauthorized: the matching handler writes the response and the
//!   inner service is never called.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::{HeaderName, Request},
    middleware::{self, Next},
    response::Response,
};

use super::handlers::{DenyHandler, JsonErrorHandler, UnauthorizedHandler};
use crate::services::auth::{AuthDecision, AuthDecisionPipeline, Principal};

/// Everything the middleware needs per request. Cheap to clone.
pub struct AccessGuard<P> {
    pipeline: Arc<AuthDecisionPipeline<P>>,
    header_name: HeaderName,
    deny: Arc<dyn DenyHandler>,
    unauthorized: Arc<dyn UnauthorizedHandler>,
}

impl<P> Clone for AccessGuard<P> {
    fn clone(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
            header_name: self.header_name.clone(),
            deny: self.deny.clone(),
            unauthorized: self.unauthorized.clone(),
        }
    }
}

impl<P> std::fmt::Debug for AccessGuard<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGuard")
            .field("header_name", &self.header_name)
            .finish_non_exhaustive()
    }
}

impl<P: Principal> AccessGuard<P> {
    /// Guard with the JSON error handlers. The header name comes from the
    /// pipeline's access config.
    pub fn new(pipeline: AuthDecisionPipeline<P>) -> Self {
        let header_name = pipeline.authenticator().config().header_name.clone();
        Self {
            pipeline: Arc::new(pipeline),
            header_name,
            deny: Arc::new(JsonErrorHandler),
            unauthorized: Arc::new(JsonErrorHandler),
        }
    }

    pub fn with_deny_handler(mut self, handler: impl DenyHandler + 'static) -> Self {
        self.deny = Arc::new(handler);
        self
    }

    pub fn with_unauthorized_handler(mut self, handler: impl UnauthorizedHandler + 'static) -> Self {
        self.unauthorized = Arc::new(handler);
        self
    }
}

/// Put the access check in front of every route of `router`.
///
/// ```ignore
/// let guard = AccessGuard::new(build_pipeline::<UserDetails>(&config)?);
/// let v1 = middleware::auth::access::apply(api::v1::routes(), guard);
/// ```
pub fn apply<S, P>(router: Router<S>, guard: AccessGuard<P>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    P: Principal,
{
    router.layer(middleware::from_fn_with_state(guard, access_middleware::<P>))
}

async fn access_middleware<P: Principal>(
    State(guard): State<AccessGuard<P>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Nested routers strip their prefix from `uri()`; rules are written
    // against the full path.
    let path = match req.extensions().get::<OriginalUri>() {
        Some(OriginalUri(uri)) => uri.path().to_owned(),
        None => req.uri().path().to_owned(),
    };

    let decision = guard
        .pipeline
        .decide_header(&path, req.headers().get(&guard.header_name));

    match decision {
        AuthDecision::Allowed(principal) => {
            // Never let a principal from elsewhere survive an anonymous pass.
            match principal {
                Some(principal) => {
                    req.extensions_mut().insert(principal);
                }
                None => {
                    req.extensions_mut().remove::<P>();
                }
            }
            next.run(req).await
        }
        AuthDecision::Denied(cause) => guard.deny.handle(&req, &cause),
        AuthDecision::Unauthorized(cause) => guard.unauthorized.handle(&req, &cause),
    }
}

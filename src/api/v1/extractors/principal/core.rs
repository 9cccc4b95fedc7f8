use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AuthError;
use crate::services::auth::Principal;

/// Principal placed in request extensions by the access middleware.
///
/// Rejects with 401 when there is none (anonymous pass or middleware not
/// applied to this route).
#[derive(Debug, Clone)]
pub struct CurrentPrincipal<P>(pub P);

impl<S, P> FromRequestParts<S> for CurrentPrincipal<P>
where
    S: Send + Sync,
    P: Principal,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<P>()
            .cloned()
            .map(CurrentPrincipal)
            .ok_or(AuthError::Unauthorized)
    }
}

#[derive(Debug, Clone)]
pub struct MaybePrincipal<P>(pub Option<P>);

impl<S, P> FromRequestParts<S> for MaybePrincipal<P>
where
    S: Send + Sync,
    P: Principal,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybePrincipal(parts.extensions.get::<P>().cloned()))
    }
}

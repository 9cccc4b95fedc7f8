//! Response writers invoked by the access middleware.
//!
//! The middleware decides; these write the response. A deny or unauthorized
//! handler is the only thing that writes a response for a rejected request,
//! and the request goes no further once it has run.

use std::fmt;

use axum::{
    body::Body,
    http::{HeaderValue, Request, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::AuthError;

/// Called when a valid principal lacks authority for the path.
pub trait DenyHandler: Send + Sync {
    fn handle(&self, request: &Request<Body>, cause: &AuthError) -> Response;
}

/// Called when a path needs a principal and none could be established.
pub trait UnauthorizedHandler: Send + Sync {
    fn handle(&self, request: &Request<Body>, cause: &AuthError) -> Response;
}

impl<F> DenyHandler for F
where
    F: Fn(&Request<Body>, &AuthError) -> Response + Send + Sync,
{
    fn handle(&self, request: &Request<Body>, cause: &AuthError) -> Response {
        self(request, cause)
    }
}

impl<F> UnauthorizedHandler for F
where
    F: Fn(&Request<Body>, &AuthError) -> Response + Send + Sync,
{
    fn handle(&self, request: &Request<Body>, cause: &AuthError) -> Response {
        self(request, cause)
    }
}

/// Default for both: status from the cause plus the JSON error body.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonErrorHandler;

impl DenyHandler for JsonErrorHandler {
    fn handle(&self, _request: &Request<Body>, cause: &AuthError) -> Response {
        cause.into_response()
    }
}

impl UnauthorizedHandler for JsonErrorHandler {
    fn handle(&self, _request: &Request<Body>, cause: &AuthError) -> Response {
        cause.into_response()
    }
}

/// Issued token handed to an `AuthenticationSuccessHandler`.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the credential
        f.write_str("Token(..)")
    }
}

/// Writes a freshly issued token to the response.
///
/// Not used by the access middleware itself; login endpoints implement or
/// reuse it.
pub trait AuthenticationSuccessHandler: Send + Sync {
    fn handle(&self, request: &Request<Body>, token: &Token) -> Response;
}

/// Writes the token's string form as a UTF-8 text body.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTokenSuccessHandler;

impl AuthenticationSuccessHandler for PlainTokenSuccessHandler {
    fn handle(&self, _request: &Request<Body>, token: &Token) -> Response {
        (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            )],
            token.to_string(),
        )
            .into_response()
    }
}

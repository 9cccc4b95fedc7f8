use std::sync::Arc;

use axum::http::HeaderValue;
use tracing::debug;

use super::claims::ClaimsCodec;
use super::principal::PrincipalCodec;
use crate::config::AccessConfig;
use crate::error::AuthError;

/// Why a presented token was turned into `InvalidToken`.
///
/// Only ever written to logs; callers see the merged `AuthError::InvalidToken`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotVisibleAscii,
    WrongScheme,
    Verification,
    IssuerMismatch,
    MissingSubject,
    UndecodableSubject,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::NotVisibleAscii => "header_not_visible_ascii",
            RejectReason::WrongScheme => "wrong_scheme",
            RejectReason::Verification => "verification_failed",
            RejectReason::IssuerMismatch => "issuer_mismatch",
            RejectReason::MissingSubject => "missing_subject",
            RejectReason::UndecodableSubject => "undecodable_subject",
        }
    }
}

/// Header value → principal.
///
/// Steps: presence, scheme prefix, signature/claims, issuer, subject decode.
/// Pure given its inputs; no I/O, no retries.
pub struct TokenAuthenticator<P> {
    config: Arc<AccessConfig>,
    claims: Arc<dyn ClaimsCodec>,
    principals: Arc<dyn PrincipalCodec<P>>,
}

impl<P> Clone for TokenAuthenticator<P> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            claims: self.claims.clone(),
            principals: self.principals.clone(),
        }
    }
}

impl<P> std::fmt::Debug for TokenAuthenticator<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthenticator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<P> TokenAuthenticator<P> {
    pub fn new(
        config: Arc<AccessConfig>,
        claims: Arc<dyn ClaimsCodec>,
        principals: Arc<dyn PrincipalCodec<P>>,
    ) -> Self {
        Self {
            config,
            claims,
            principals,
        }
    }

    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    /// Same as `authenticate`, starting from the raw header. A header that is
    /// present but not visible ASCII counts as an invalid token.
    pub fn authenticate_header(&self, header: Option<&HeaderValue>) -> Result<P, AuthError> {
        match header.map(HeaderValue::to_str) {
            None => Err(AuthError::Unauthorized),
            Some(Err(_)) => Err(reject(RejectReason::NotVisibleAscii)),
            Some(Ok(value)) => self.authenticate(Some(value)),
        }
    }

    pub fn authenticate(&self, header: Option<&str>) -> Result<P, AuthError> {
        let header = header.ok_or(AuthError::Unauthorized)?;

        let token = self
            .strip_prefix(header)
            .ok_or_else(|| reject(RejectReason::WrongScheme))?;

        let claims = self.claims.verify_and_decode(token).map_err(|err| {
            debug!(kind = ?err.kind(), "token verification failed");
            reject(RejectReason::Verification)
        })?;

        if claims.iss.as_deref() != Some(self.config.expected_issuer.as_str()) {
            return Err(reject(RejectReason::IssuerMismatch));
        }

        let subject = claims
            .sub
            .ok_or_else(|| reject(RejectReason::MissingSubject))?;

        // The decode error can echo parts of the subject; keep it out of the logs.
        self.principals
            .decode(&subject)
            .map_err(|_| reject(RejectReason::UndecodableSubject))
    }

    /// `<prefix> <token>` → `<token>`. An empty prefix takes the whole value.
    fn strip_prefix<'a>(&self, header: &'a str) -> Option<&'a str> {
        let prefix = self.config.token_prefix.as_str();
        if prefix.is_empty() {
            return Some(header);
        }
        header.strip_prefix(prefix)?.strip_prefix(' ')
    }
}

fn reject(reason: RejectReason) -> AuthError {
    debug!(reason = reason.as_str(), "token rejected");
    AuthError::InvalidToken
}

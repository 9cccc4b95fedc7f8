//! Authenticated identity and its string codec.
//!
//! The token's `sub` claim carries the principal in encoded form. Which Rust
//! type it decodes into is fixed when the codec is constructed
//! (`JsonPrincipalCodec::<UserDetails>::new()`), not looked up at runtime.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use uuid::Uuid;

/// Identity attached to a request once its token has been accepted.
///
/// The middleware stores the value in request extensions keyed by its type,
/// so it must be cheap enough to clone and safe to share between threads.
pub trait Principal: Clone + Send + Sync + 'static {
    /// Granted authorities (roles, scopes...) used by authority rules.
    fn authorities(&self) -> &[String];

    fn has_authority(&self, authority: &str) -> bool {
        self.authorities().iter().any(|a| a == authority)
    }
}

/// Default principal shape carried in `sub`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    pub id: Uuid,
    pub username: String,
    #[serde(default)]
    pub authorities: Vec<String>,
}

impl UserDetails {
    pub fn new(id: Uuid, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            authorities: Vec::new(),
        }
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authorities.push(authority.into());
        self
    }
}

impl Principal for UserDetails {
    fn authorities(&self) -> &[String] {
        &self.authorities
    }
}

#[derive(Debug, Error)]
pub enum PrincipalCodecError {
    #[error("subject could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("principal could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Converts between a principal and its compact string form.
pub trait PrincipalCodec<P>: Send + Sync {
    fn decode(&self, subject: &str) -> Result<P, PrincipalCodecError>;

    fn encode(&self, principal: &P) -> Result<String, PrincipalCodecError>;
}

/// JSON codec bound to the target principal type `P`.
pub struct JsonPrincipalCodec<P> {
    _marker: PhantomData<fn() -> P>,
}

impl<P> JsonPrincipalCodec<P> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<P> Default for JsonPrincipalCodec<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for JsonPrincipalCodec<P> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for JsonPrincipalCodec<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonPrincipalCodec")
            .field("target", &std::any::type_name::<P>())
            .finish()
    }
}

impl<P> PrincipalCodec<P> for JsonPrincipalCodec<P>
where
    P: Serialize + DeserializeOwned,
{
    fn decode(&self, subject: &str) -> Result<P, PrincipalCodecError> {
        serde_json::from_str(subject).map_err(PrincipalCodecError::Decode)
    }

    fn encode(&self, principal: &P) -> Result<String, PrincipalCodecError> {
        serde_json::to_string(principal).map_err(PrincipalCodecError::Encode)
    }
}

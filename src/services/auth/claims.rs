use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

use crate::config::JwtKey;
use crate::error::AppError;

/// Claims this crate reads from a verified token.
///
/// Both are optional at the serde level: a token without `iss` or `sub` still
/// decodes and is then rejected by the authenticator like any other bad token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub iss: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
}

#[derive(Debug, Error)]
#[error("token verification failed: {0}")]
pub struct ClaimsError(#[from] jsonwebtoken::errors::Error);

impl ClaimsError {
    pub fn kind(&self) -> &jsonwebtoken::errors::ErrorKind {
        self.0.kind()
    }
}

/// Verifies a token's signature and decodes its claims.
pub trait ClaimsCodec: Send + Sync {
    fn verify_and_decode(&self, token: &str) -> Result<Claims, ClaimsError>;
}

/// `jsonwebtoken`-backed codec.
///
/// Signature, `exp` and `nbf` (and `aud` when configured) are checked by
/// `jsonwebtoken::Validation`. The issuer is left to the authenticator, which
/// compares it against the configured value itself.
#[derive(Clone)]
pub struct JwtClaimsCodec {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtClaimsCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtClaimsCodec")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtClaimsCodec {
    pub fn new(decoding_key: DecodingKey, algorithm: Algorithm, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.leeway = leeway_seconds;
        validation.validate_nbf = true;
        // `aud` is only checked once an audience is configured.
        validation.validate_aud = false;

        Self {
            decoding_key,
            validation,
        }
    }

    /// HS256 with a shared secret.
    pub fn from_secret(secret: &[u8], leeway_seconds: u64) -> Self {
        Self::new(
            DecodingKey::from_secret(secret),
            Algorithm::HS256,
            leeway_seconds,
        )
    }

    /// EdDSA with an Ed25519 public key in PEM format.
    pub fn from_ed_pem(public_key_pem: &str, leeway_seconds: u64) -> Result<Self, AppError> {
        let decoding_key = DecodingKey::from_ed_pem(public_key_pem.as_bytes()).map_err(|e| {
            tracing::warn!(error = %e, "failed to parse access JWT public key PEM (expected Ed25519)");
            AppError::Key(e.to_string())
        })?;

        Ok(Self::new(decoding_key, Algorithm::EdDSA, leeway_seconds))
    }

    pub fn from_key(key: &JwtKey, leeway_seconds: u64) -> Result<Self, AppError> {
        match key {
            JwtKey::Secret(secret) => Ok(Self::from_secret(secret.as_bytes(), leeway_seconds)),
            JwtKey::EdPublicPem(pem) => Self::from_ed_pem(pem, leeway_seconds),
        }
    }

    pub fn with_audience(mut self, audience: &str) -> Self {
        self.validation.set_audience(&[audience]);
        self.validation.validate_aud = true;
        self
    }
}

impl ClaimsCodec for JwtClaimsCodec {
    fn verify_and_decode(&self, token: &str) -> Result<Claims, ClaimsError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

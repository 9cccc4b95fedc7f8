/*
 * Responsibility
 * - Load settings from the environment once at startup (PORT, AUTH_* ...)
 * - Validate them (missing or malformed values fail startup)
 * - Hand out AccessConfig as an immutable value shared by every request
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderName;
use thiserror::Error;

use crate::services::auth::authority::{PathRules, Rule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Header name, token prefix and expected issuer.
///
/// Built once and shared read-only (behind `Arc`) across all requests.
#[derive(Debug, Clone)]
pub struct AccessConfig {
    pub header_name: HeaderName,
    pub token_prefix: String,
    pub expected_issuer: String,
}

impl AccessConfig {
    pub fn new(
        header_name: HeaderName,
        token_prefix: impl Into<String>,
        expected_issuer: impl Into<String>,
    ) -> Self {
        Self {
            header_name,
            token_prefix: token_prefix.into(),
            expected_issuer: expected_issuer.into(),
        }
    }

    /// `Authorization: Bearer <token>` with the given issuer.
    pub fn bearer(expected_issuer: impl Into<String>) -> Self {
        Self::new(
            axum::http::header::AUTHORIZATION,
            "Bearer",
            expected_issuer,
        )
    }
}

/// Verification key for incoming tokens.
#[derive(Clone)]
pub enum JwtKey {
    /// HS256 shared secret.
    Secret(String),
    /// Ed25519 public key, PEM encoded.
    EdPublicPem(String),
}

impl std::fmt::Debug for JwtKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        match self {
            JwtKey::Secret(_) => f.write_str("JwtKey::Secret(..)"),
            JwtKey::EdPublicPem(_) => f.write_str("JwtKey::EdPublicPem(..)"),
        }
    }
}

/// Transport limits applied to every route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    pub body_limit_bytes: usize,
    pub request_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            body_limit_bytes: 1024 * 1024,
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub http: HttpSettings,

    pub access: AccessConfig,
    pub audience: Option<String>,
    pub leeway_seconds: u64,
    pub jwt_key: JwtKey,

    pub rules: PathRules,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let mut http = HttpSettings::default();
        if let Some(raw) = lookup("HTTP_BODY_LIMIT_BYTES") {
            http.body_limit_bytes = raw
                .parse()
                .map_err(|_| ConfigError::Invalid("HTTP_BODY_LIMIT_BYTES"))?;
        }
        if let Some(raw) = lookup("HTTP_TIMEOUT_SECONDS") {
            let seconds: u64 = raw
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::Invalid("HTTP_TIMEOUT_SECONDS"))?;
            http.request_timeout = Duration::from_secs(seconds);
        }

        let header_name = lookup("AUTH_HEADER_NAME").unwrap_or_else(|| "Authorization".to_string());
        let header_name = HeaderName::from_bytes(header_name.trim().as_bytes())
            .map_err(|_| ConfigError::Invalid("AUTH_HEADER_NAME"))?;

        let token_prefix = lookup("AUTH_TOKEN_PREFIX").unwrap_or_else(|| "Bearer".to_string());
        if token_prefix.contains(char::is_whitespace) {
            return Err(ConfigError::Invalid("AUTH_TOKEN_PREFIX"));
        }

        let expected_issuer = lookup("AUTH_ISSUER")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("AUTH_ISSUER"))?;

        let audience = lookup("AUTH_AUDIENCE").filter(|s| !s.trim().is_empty());

        let leeway_seconds = match lookup("AUTH_LEEWAY_SECONDS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("AUTH_LEEWAY_SECONDS"))?,
            None => 60,
        };

        let secret = lookup("AUTH_JWT_SECRET").filter(|s| !s.is_empty());
        let pem = lookup("AUTH_JWT_PUBLIC_KEY_PEM")
            .filter(|s| !s.is_empty())
            .map(|s| s.replace("\\n", "\n"));
        let jwt_key = match (secret, pem) {
            (Some(secret), None) => JwtKey::Secret(secret),
            (None, Some(pem)) => JwtKey::EdPublicPem(pem),
            (None, None) => return Err(ConfigError::Missing("AUTH_JWT_SECRET")),
            (Some(_), Some(_)) => return Err(ConfigError::Invalid("AUTH_JWT_SECRET")),
        };

        let default_rule = match lookup("AUTH_DEFAULT_RULE") {
            Some(raw) => Rule::from_str(&raw).map_err(|_| ConfigError::Invalid("AUTH_DEFAULT_RULE"))?,
            None => Rule::Authenticated,
        };

        let rules = lookup("AUTH_RULES").unwrap_or_else(|| "/**=authenticated".to_string());
        let rules = PathRules::parse(&rules, default_rule)
            .map_err(|_| ConfigError::Invalid("AUTH_RULES"))?;

        Ok(Self {
            addr,
            app_env,
            http,
            access: AccessConfig::new(header_name, token_prefix, expected_issuer),
            audience,
            leeway_seconds,
            jwt_key,
            rules,
        })
    }
}

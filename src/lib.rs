//! Bearer-token access middleware for axum.
//!
//! A request's token is verified, its subject decoded into a typed principal,
//! and the principal checked against the rule configured for the request
//! path. The outcome is exactly one of: continue (with or without a
//! principal), deny, or unauthorized.
//!
//! ```ignore
//! let config = Config::from_env()?;
//! let guard = AccessGuard::new(build_pipeline::<UserDetails>(&config)?);
//! let app = middleware::auth::apply(routes, guard);
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

pub use config::{AccessConfig, Config};
pub use error::{AppError, AuthError};
pub use middleware::auth::{AccessGuard, DenyHandler, UnauthorizedHandler};
pub use services::auth::{AuthDecision, AuthDecisionPipeline, Principal, UserDetails};

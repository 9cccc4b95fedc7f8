/*
 * Responsibility
 * - URL layout of v1
 * - The access check is applied by the caller (app::build_router), so every
 *   route here is subject to the configured authority rules
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    me::{admin, me},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/me", get(me))
        .route("/admin", get(admin))
}

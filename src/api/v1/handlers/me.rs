/*
 * Responsibility
 * - GET /me: who the access middleware says the caller is (anonymous allowed
 *   when the rule for the path permits it)
 * - GET /admin: requires a principal; authority is enforced by the rules
 */
use axum::Json;

use crate::api::v1::dto::me::{MeResponse, PrincipalResponse};
use crate::api::v1::extractors::{CurrentPrincipal, MaybePrincipal};
use crate::services::auth::UserDetails;

pub async fn me(MaybePrincipal(principal): MaybePrincipal<UserDetails>) -> Json<MeResponse> {
    Json(MeResponse::from_principal(principal))
}

pub async fn admin(
    CurrentPrincipal(principal): CurrentPrincipal<UserDetails>,
) -> Json<PrincipalResponse> {
    tracing::info!(user_id = %principal.id, "admin endpoint accessed");
    Json(PrincipalResponse::from(principal))
}

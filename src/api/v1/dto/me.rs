/*
 * Responsibility
 * - Response DTOs for the identity endpoints (/me, /admin)
 */
use serde::Serialize;
use uuid::Uuid;

use crate::services::auth::UserDetails;

#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub id: Uuid,
    pub username: String,
    pub authorities: Vec<String>,
}

impl From<UserDetails> for PrincipalResponse {
    fn from(user: UserDetails) -> Self {
        Self {
            id: user.id,
            username: user.username,
            authorities: user.authorities,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub anonymous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<PrincipalResponse>,
}

impl MeResponse {
    pub fn from_principal(principal: Option<UserDetails>) -> Self {
        Self {
            anonymous: principal.is_none(),
            principal: principal.map(PrincipalResponse::from),
        }
    }
}

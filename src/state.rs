/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Cloned per request; internals are Arc so clones are cheap
 */
use crate::middleware::auth::AccessGuard;
use crate::services::auth::UserDetails;

#[derive(Clone, Debug)]
pub struct AppState {
    pub guard: AccessGuard<UserDetails>,
}

impl AppState {
    pub fn new(guard: AccessGuard<UserDetails>) -> Self {
        Self { guard }
    }
}

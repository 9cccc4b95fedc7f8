/*!
 * Principal extractors
 *
 * Responsibility:
 * - Hand the principal stored by the access middleware to handlers
 *
 * Public API:
 * - CurrentPrincipal (required, 401 when absent)
 * - MaybePrincipal (optional, for routes that also serve anonymous callers)
 */

mod core;

pub use core::{CurrentPrincipal, MaybePrincipal};

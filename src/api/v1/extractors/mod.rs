/*
 * Responsibility
 * - Re-export the extractors v1 handlers use
 */
pub mod principal;

pub use principal::{CurrentPrincipal, MaybePrincipal};

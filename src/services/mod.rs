/*
 * Responsibility
 * - Token verification, principal decoding, authority rules, decision pipeline
 * - No HTTP framework types beyond header values; axum wiring lives in middleware
 */
pub mod auth;

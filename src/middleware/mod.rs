/*
 * Responsibility
 * - Public surface of the middleware layer
 * - auth: access check in front of the API routes
 * - http: request id / tracing / body limit / timeout
 */
pub mod auth;
pub mod http;

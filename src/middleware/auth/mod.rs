/*
 * Responsibility
 * - Access middleware (decision → dispatch) and the handler contracts it calls
 */
pub mod access;
pub mod handlers;

pub use access::{AccessGuard, apply};
pub use handlers::{
    AuthenticationSuccessHandler, DenyHandler, JsonErrorHandler, PlainTokenSuccessHandler, Token,
    UnauthorizedHandler,
};

//! Error types returned to HTTP clients.

mod auth_error;

pub use auth_error::AuthError;

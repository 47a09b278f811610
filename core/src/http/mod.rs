//! HTTP-facing security layer.

pub mod error;
pub mod security;

//! # LisaDocs Core
//!
//! Role and workspace access control for the LisaDocs document manager,
//! plus the Actix Web plumbing that hosts it.
//!
//! ## Modules
//!
//! - [`http::security`] - Roles, workspaces, access resolution, routing and middleware
//! - [`http::error`] - Error types

pub mod http;

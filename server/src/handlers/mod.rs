//! HTTP handlers.
//!
//! Workspace paths are authorized by the middleware before these run;
//! handlers still derive controls and scope from the request's user.

pub mod admin;
pub mod auth;
pub mod documents;
pub mod workspaces;

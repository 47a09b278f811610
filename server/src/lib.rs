//! LisaDocs HTTP front-end.
//!
//! JSON dashboards per workspace, document endpoints delegating to a
//! [`DocumentService`], and the user administration option tables. All
//! access decisions come from `lisadocs_core`.

pub mod config;
pub mod demo;
pub mod handlers;
pub mod observability;

use std::sync::Arc;

use actix_web::http::Method;
use actix_web::web;
use anyhow::{Context, Result};

use lisadocs_core::http::security::manager::{AuthenticationManager, AuthorizationManager};
use lisadocs_core::http::security::{Action, AuditLogger, DocumentService, Role, SessionRegistry, WorkspaceAuthorizer};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<dyn DocumentService>,
    pub sessions: SessionRegistry,
    pub audit: AuditLogger,
}

impl AppState {
    pub fn new(documents: Arc<dyn DocumentService>, audit: AuditLogger) -> Self {
        AppState {
            documents,
            sessions: AuthenticationManager::session_registry().audit_logger(audit.clone()),
            audit,
        }
    }
}

/// Path rules for the security middleware. First match wins.
pub fn workspace_authorizer(audit: AuditLogger) -> Result<WorkspaceAuthorizer> {
    AuthorizationManager::workspace_authorizer()
        .audit_logger(audit)
        .add_method_matcher(
            Method::POST,
            r"^/workspaces/([^/]+)/documents/\d+/archive/?$",
            Action::Archive,
        )
        .and_then(|a| {
            a.add_method_matcher(Method::POST, r"^/workspaces/([^/]+)/documents/?$", Action::Upload)
        })
        .and_then(|a| a.add_matcher(r"^/workspaces/([^/]+)(/.*)?$", Action::View))
        .and_then(|a| a.add_role_matcher(r"^/admin(/.*)?$", &[Role::Administrador]))
        .with_context(|| "compile workspace path rules")
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::auth::profile)
        .service(handlers::auth::logout)
        .service(handlers::workspaces::list_workspaces)
        .service(handlers::workspaces::dashboard)
        .service(handlers::documents::list_documents)
        .service(handlers::documents::upload_document)
        .service(handlers::documents::archive_document)
        .service(handlers::admin::options);
}

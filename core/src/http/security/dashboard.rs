//! Per-workspace dashboard shell.
//!
//! A shell is mounted once per visit to a workspace. Mounting fixes the
//! control flags and the listing scope; actions triggered later are checked
//! again against the user current at that moment.

use serde::Serialize;

use crate::http::error::AuthError;
use crate::http::security::document::{
    Document, DocumentPage, DocumentQuery, DocumentService, DocumentStatus, NewDocument,
};
use crate::http::security::resolver::{AccessDecision, AccessResolver, Action};
use crate::http::security::router::{RouteDecision, WorkspaceRouter};
use crate::http::security::table::sees_all_documents;
use crate::http::security::user::User;
use crate::http::security::workspace::Workspace;

/// Which documents the listing covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", content = "userId", rename_all = "snake_case")]
pub enum DocumentScope {
    All,
    CreatedBy(String),
}

impl DocumentScope {
    pub fn for_user(user: &User, workspace: Workspace) -> Self {
        if sees_all_documents(user.get_role(), workspace) {
            DocumentScope::All
        } else {
            DocumentScope::CreatedBy(user.get_id().to_string())
        }
    }
}

/// Control visibility for one row of the document table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowActions {
    pub can_archive: bool,
    pub can_manage: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardShell {
    workspace: Workspace,
    controls: AccessDecision,
    scope: DocumentScope,
}

impl DashboardShell {
    /// Computes controls and scope for `user` on `workspace`.
    pub fn mount(user: &User, workspace: Workspace) -> Self {
        DashboardShell {
            workspace,
            controls: AccessResolver::new().access_decision(Some(user), workspace),
            scope: DocumentScope::for_user(user, workspace),
        }
    }

    /// Mounts the shell for a granted route; denials come back as errors.
    pub fn from_route(user: &User, decision: RouteDecision) -> Result<Self, AuthError> {
        match decision {
            RouteDecision::Granted(workspace) => Ok(Self::mount(user, workspace)),
            RouteDecision::Denied(panel) => Err(AuthError::from_panel(panel)),
        }
    }

    pub fn workspace(&self) -> Workspace {
        self.workspace
    }

    pub fn controls(&self) -> AccessDecision {
        self.controls
    }

    pub fn scope(&self) -> &DocumentScope {
        &self.scope
    }

    /// Listing filter with this shell's scope applied.
    pub fn query(&self, page: usize, per_page: usize, status: Option<DocumentStatus>) -> DocumentQuery {
        let query = DocumentQuery::new(self.workspace)
            .page(page, per_page)
            .status(status);
        match &self.scope {
            DocumentScope::All => query,
            DocumentScope::CreatedBy(user_id) => query.created_by(user_id.clone()),
        }
    }

    /// Row controls derived from the mount-time flags.
    pub fn row_actions(&self, document: &Document) -> RowActions {
        RowActions {
            can_archive: self.controls.can_archive && document.status != DocumentStatus::Archived,
            can_manage: self.controls.can_manage,
        }
    }

    /// Checks `action` against the user current when the event fires.
    pub fn authorize(&self, current: Option<&User>, action: Action) -> Result<(), AuthError> {
        match WorkspaceRouter::new().route_action(current, self.workspace.as_str(), action) {
            RouteDecision::Granted(_) => Ok(()),
            RouteDecision::Denied(panel) => Err(AuthError::from_panel(panel)),
        }
    }

    pub async fn list<S>(
        &self,
        service: &S,
        current: Option<&User>,
        page: usize,
        per_page: usize,
        status: Option<DocumentStatus>,
    ) -> Result<DocumentPage, AuthError>
    where
        S: DocumentService + ?Sized,
    {
        self.authorize(current, Action::View)?;
        let query = self.query(page, per_page, status);
        Ok(service.list_documents(&query).await?)
    }

    pub async fn upload<S>(
        &self,
        service: &S,
        current: Option<&User>,
        document: NewDocument,
    ) -> Result<Document, AuthError>
    where
        S: DocumentService + ?Sized,
    {
        self.authorize(current, Action::Upload)?;
        let created_by = current.map(User::get_id).unwrap_or_default();
        Ok(service
            .upload_document(self.workspace, created_by, document)
            .await?)
    }

    pub async fn archive<S>(
        &self,
        service: &S,
        current: Option<&User>,
        id: u64,
    ) -> Result<Document, AuthError>
    where
        S: DocumentService + ?Sized,
    {
        self.authorize(current, Action::Archive)?;
        Ok(service.archive_document(self.workspace, id).await?)
    }
}

use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use lisadocs_core::http::error::AuthError;
use lisadocs_core::http::security::{
    AccessDecision, AccessResolver, AuthenticatedUser, DashboardShell, Document, DocumentPage,
    DocumentQuery, DocumentScope, RowActions, Workspace, WorkspaceRouter,
};

use crate::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WorkspaceEntry {
    workspace: Workspace,
    label: &'static str,
    access: AccessDecision,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRow {
    #[serde(flatten)]
    pub document: Document,
    pub actions: RowActions,
}

/// Dashboard payload: mount-time controls plus the first listing page.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub workspace: Workspace,
    pub label: &'static str,
    pub controls: AccessDecision,
    pub scope: DocumentScope,
    pub documents: Vec<DocumentRow>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

impl DashboardView {
    pub fn new(shell: &DashboardShell, page: DocumentPage) -> Self {
        let documents = page
            .items
            .into_iter()
            .map(|document| DocumentRow {
                actions: shell.row_actions(&document),
                document,
            })
            .collect();
        DashboardView {
            workspace: shell.workspace(),
            label: shell.workspace().label(),
            controls: shell.controls(),
            scope: shell.scope().clone(),
            documents,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
        }
    }
}

#[get("/workspaces")]
pub async fn list_workspaces(user: AuthenticatedUser) -> HttpResponse {
    let resolver = AccessResolver::new();
    let entries: Vec<WorkspaceEntry> = resolver
        .accessible_workspaces(Some(&*user))
        .into_iter()
        .map(|workspace| WorkspaceEntry {
            workspace,
            label: workspace.label(),
            access: resolver.access_decision(Some(&*user), workspace),
        })
        .collect();
    HttpResponse::Ok().json(entries)
}

#[get("/workspaces/{segment}")]
pub async fn dashboard(
    user: AuthenticatedUser,
    segment: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AuthError> {
    let decision = WorkspaceRouter::new().route(Some(&*user), &segment);
    let shell = DashboardShell::from_route(&user, decision)?;
    let page = shell
        .list(
            state.documents.as_ref(),
            Some(&*user),
            1,
            DocumentQuery::DEFAULT_PER_PAGE,
            None,
        )
        .await?;
    Ok(HttpResponse::Ok().json(DashboardView::new(&shell, page)))
}

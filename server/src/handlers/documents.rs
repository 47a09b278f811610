use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;

use lisadocs_core::http::error::AuthError;
use lisadocs_core::http::security::{
    AuthenticatedUser, DashboardShell, DocumentQuery, DocumentStatus, NewDocument, SecurityEvent,
    WorkspaceRouter,
};

use crate::handlers::workspaces::DashboardView;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    page: Option<usize>,
    per_page: Option<usize>,
    status: Option<DocumentStatus>,
}

fn mount(user: &AuthenticatedUser, segment: &str) -> Result<DashboardShell, AuthError> {
    DashboardShell::from_route(user, WorkspaceRouter::new().route(Some(&**user), segment))
}

#[get("/workspaces/{segment}/documents")]
pub async fn list_documents(
    user: AuthenticatedUser,
    segment: web::Path<String>,
    params: web::Query<ListParams>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AuthError> {
    let shell = mount(&user, &segment)?;
    let page = shell
        .list(
            state.documents.as_ref(),
            Some(&*user),
            params.page.unwrap_or(1),
            params.per_page.unwrap_or(DocumentQuery::DEFAULT_PER_PAGE),
            params.status,
        )
        .await?;
    Ok(HttpResponse::Ok().json(DashboardView::new(&shell, page)))
}

#[post("/workspaces/{segment}/documents")]
pub async fn upload_document(
    user: AuthenticatedUser,
    segment: web::Path<String>,
    body: web::Json<NewDocument>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AuthError> {
    let shell = mount(&user, &segment)?;
    let document = shell
        .upload(state.documents.as_ref(), Some(&*user), body.into_inner())
        .await?;
    state.audit.log(SecurityEvent::document_uploaded(
        user.get_id(),
        document.workspace,
        document.id,
    ));
    Ok(HttpResponse::Created().json(document))
}

#[post("/workspaces/{segment}/documents/{id}/archive")]
pub async fn archive_document(
    user: AuthenticatedUser,
    path: web::Path<(String, u64)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AuthError> {
    let (segment, id) = path.into_inner();
    let shell = mount(&user, &segment)?;
    let document = shell.archive(state.documents.as_ref(), Some(&*user), id).await?;
    state.audit.log(SecurityEvent::document_archived(
        user.get_id(),
        document.workspace,
        document.id,
    ));
    Ok(HttpResponse::Ok().json(document))
}

//! User administration (administrador only, enforced by the middleware).

use actix_web::{get, HttpResponse, Responder};
use serde_json::json;

use lisadocs_core::http::security::{role_options, workspace_options, AuthenticatedUser};

/// Role and workspace option tables for the user forms.
#[get("/admin/options")]
pub async fn options(_user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "roles": role_options(),
        "workspaces": workspace_options(),
    }))
}

use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

use lisadocs_core::http::security::session::bearer_token;
use lisadocs_core::http::security::{AccessResolver, AuthenticatedUser, User, Workspace};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
struct ProfileView<'a> {
    user: &'a User,
    workspaces: Vec<Workspace>,
}

/// Current session user and the workspaces it can open.
#[get("/auth/profile")]
pub async fn profile(user: AuthenticatedUser) -> impl Responder {
    let workspaces = AccessResolver::new().accessible_workspaces(Some(&*user));
    HttpResponse::Ok().json(ProfileView {
        user: &*user,
        workspaces,
    })
}

#[post("/auth/logout")]
pub async fn logout(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    match bearer_token(req.headers()).and_then(|token| state.sessions.close(token)) {
        Some(user) => {
            tracing::info!(user = %user, "logged out");
            HttpResponse::NoContent().finish()
        }
        None => HttpResponse::Unauthorized().json(json!({ "error": "no session to close" })),
    }
}

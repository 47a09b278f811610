//! Common test utilities.
//!
//! Every test gets its own sessions, documents and audit store.
//! Tokens follow the role name: `Bearer secretario_cam`, `Bearer cf_member`...

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{test, web, App};

use lisadocs_core::http::security::middleware::SecurityTransform;
use lisadocs_core::http::security::{
    AuditLogger, DocumentStatus, InMemoryDocumentService, InMemoryEventStore, Permissions, Role,
    User, Workspace,
};
use lisadocs_server::{configure, workspace_authorizer, AppState};

pub struct TestContext {
    pub state: AppState,
    pub documents: InMemoryDocumentService,
    pub events: InMemoryEventStore,
}

/// Test users, one per role. Ids follow `Role::ALL` order starting at 1.
pub fn test_user(role: Role) -> User {
    let id = Role::ALL.iter().position(|r| *r == role).unwrap() + 1;
    let permissions = match role {
        Role::SecretarioCam => Permissions::new()
            .manage(&[Workspace::Cam])
            .archive(&[Workspace::Cam]),
        Role::SecretarioAmpp => Permissions::new().view(&[Workspace::Ampp, Workspace::Cam]),
        _ => Permissions::new(),
    };
    User::new(id.to_string(), role).permissions(permissions)
}

impl TestContext {
    pub fn new() -> Self {
        let documents = InMemoryDocumentService::new()
            .with_document(Workspace::Cam, "4", "Acta secretaria", DocumentStatus::Stored)
            .with_document(Workspace::Cam, "7", "Informe intendente", DocumentStatus::Stored)
            .with_document(Workspace::Ampp, "5", "Presupuesto", DocumentStatus::Stored)
            .with_document(Workspace::ComisionesCf, "8", "Minuta", DocumentStatus::Archived);
        let events = InMemoryEventStore::new();
        let audit = AuditLogger::new().add_handler(events.clone());
        let state = AppState::new(Arc::new(documents.clone()), audit);

        for role in Role::ALL {
            state.sessions.open_with_token(role.as_str(), test_user(role));
        }

        TestContext {
            state,
            documents,
            events,
        }
    }
}

pub fn bearer(role: Role) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", role.as_str()))
}

pub async fn create_test_app(
    ctx: &TestContext,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    let authorizer = workspace_authorizer(ctx.state.audit.clone()).unwrap();
    test::init_service(
        App::new()
            .app_data(web::Data::new(ctx.state.clone()))
            .service(
                web::scope("")
                    .wrap(
                        SecurityTransform::new()
                            .config_authenticator(ctx.state.sessions.clone())
                            .config_authorizer(authorizer),
                    )
                    .configure(configure),
            ),
    )
    .await
}

pub async fn read_json<B>(resp: actix_web::dev::ServiceResponse<B>) -> serde_json::Value
where
    B: actix_web::body::MessageBody,
{
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).unwrap()
}

//! LisaDocs server.
//!
//! Configuration comes from `LISADOCS_*` environment variables, log
//! filtering from `RUST_LOG`.

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};

use lisadocs_core::http::security::middleware::SecurityTransform;
use lisadocs_core::http::security::{init_global_logger, InMemoryDocumentService};
use lisadocs_server::config::ServerConfig;
use lisadocs_server::{configure, demo, observability, workspace_authorizer, AppState};

#[actix_web::main]
async fn main() -> Result<()> {
    observability::init_tracing();
    let config = ServerConfig::from_env()?;

    let audit = observability::audit_logger(&config);
    init_global_logger(audit.clone());

    let documents = if config.demo_sessions {
        demo::seed_documents()
    } else {
        InMemoryDocumentService::new()
    };
    let state = AppState::new(Arc::new(documents), audit.clone());
    if config.demo_sessions {
        for (role, token) in demo::seed_sessions(&state.sessions) {
            tracing::info!(%role, "demo session opened");
            tracing::debug!(%role, token = %token, "demo session token");
        }
    }

    let authorizer = workspace_authorizer(audit)?;
    let data = web::Data::new(state);

    tracing::info!(bind = %config.bind_addr, "starting lisadocs server");
    HttpServer::new(move || {
        App::new().app_data(data.clone()).service(
            web::scope("")
                .wrap(
                    SecurityTransform::new()
                        .config_authenticator(data.sessions.clone())
                        .config_authorizer(authorizer.clone()),
                )
                .configure(configure),
        )
    })
    .bind(config.bind_addr)
    .with_context(|| format!("bind {}", config.bind_addr))?
    .run()
    .await
    .with_context(|| "run http server")
}

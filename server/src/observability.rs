//! Tracing set-up for the server.
//!
//! Initialization is guarded by `OnceLock` so tests may call it repeatedly.
use std::sync::OnceLock;

use lisadocs_core::http::security::{AuditLogger, TracingHandler};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Installs the fmt subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init();
    });
}

/// Audit logger writing through `tracing`, or a disabled one.
pub fn audit_logger(config: &ServerConfig) -> AuditLogger {
    if config.audit_enabled {
        AuditLogger::new().add_handler(TracingHandler::new().min_severity(config.audit_min_severity))
    } else {
        AuditLogger::new().enabled(false)
    }
}

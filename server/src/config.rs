use std::net::SocketAddr;

use anyhow::{bail, Context, Result};
use lisadocs_core::http::security::SecurityEventSeverity;

// Server configuration sourced from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub audit_enabled: bool,
    pub audit_min_severity: SecurityEventSeverity,
    /// Seed one session per role plus sample documents.
    pub demo_sessions: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            audit_enabled: true,
            audit_min_severity: SecurityEventSeverity::Info,
            demo_sessions: true,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup("LISADOCS_BIND") {
            config.bind_addr = value.parse().with_context(|| "parse LISADOCS_BIND")?;
        }
        if let Some(value) = lookup("LISADOCS_AUDIT") {
            config.audit_enabled = parse_bool(&value).with_context(|| "parse LISADOCS_AUDIT")?;
        }
        if let Some(value) = lookup("LISADOCS_AUDIT_MIN_SEVERITY") {
            config.audit_min_severity = value
                .parse::<SecurityEventSeverity>()
                .map_err(anyhow::Error::msg)
                .with_context(|| "parse LISADOCS_AUDIT_MIN_SEVERITY")?;
        }
        if let Some(value) = lookup("LISADOCS_DEMO_SESSIONS") {
            config.demo_sessions =
                parse_bool(&value).with_context(|| "parse LISADOCS_DEMO_SESSIONS")?;
        }
        Ok(config)
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got '{other}'"),
    }
}

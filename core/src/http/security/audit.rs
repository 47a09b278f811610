//! Access audit log.
//!
//! Records every workspace decision and session change so that denials can
//! be explained and reviewed later.
//!
//! # Example
//!
//! ```
//! use lisadocs_core::http::security::audit::{AuditLogger, InMemoryEventStore, SecurityEvent};
//! use lisadocs_core::http::security::{Action, Role, Workspace};
//!
//! let store = InMemoryEventStore::new();
//! let audit_logger = AuditLogger::new().add_handler(store.clone());
//!
//! audit_logger.log(SecurityEvent::access_granted("42", Role::SecretarioCam, Action::View, Workspace::Cam));
//! assert_eq!(store.len(), 1);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::http::security::resolver::{Action, DecisionReason};
use crate::http::security::role::Role;
use crate::http::security::router::DenialPanel;
use crate::http::security::workspace::Workspace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityEventType {
    /// Workspace action allowed
    AccessGranted,
    /// Workspace action denied
    AccessDenied,
    /// Navigation to a segment naming no workspace
    WorkspaceNotRecognized,
    /// Protected path requested without a session
    AuthenticationRequired,
    SessionOpened,
    SessionRefreshed,
    SessionClosed,
    DocumentUploaded,
    DocumentArchived,
    Custom(String),
}

impl fmt::Display for SecurityEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityEventType::AccessGranted => write!(f, "ACCESS_GRANTED"),
            SecurityEventType::AccessDenied => write!(f, "ACCESS_DENIED"),
            SecurityEventType::WorkspaceNotRecognized => write!(f, "WORKSPACE_NOT_RECOGNIZED"),
            SecurityEventType::AuthenticationRequired => write!(f, "AUTHENTICATION_REQUIRED"),
            SecurityEventType::SessionOpened => write!(f, "SESSION_OPENED"),
            SecurityEventType::SessionRefreshed => write!(f, "SESSION_REFRESHED"),
            SecurityEventType::SessionClosed => write!(f, "SESSION_CLOSED"),
            SecurityEventType::DocumentUploaded => write!(f, "DOCUMENT_UPLOADED"),
            SecurityEventType::DocumentArchived => write!(f, "DOCUMENT_ARCHIVED"),
            SecurityEventType::Custom(name) => write!(f, "CUSTOM_{}", name.to_uppercase()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum SecurityEventSeverity {
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for SecurityEventSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityEventSeverity::Info => write!(f, "INFO"),
            SecurityEventSeverity::Warning => write!(f, "WARNING"),
            SecurityEventSeverity::Error => write!(f, "ERROR"),
            SecurityEventSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl std::str::FromStr for SecurityEventSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(SecurityEventSeverity::Info),
            "warning" | "warn" => Ok(SecurityEventSeverity::Warning),
            "error" => Ok(SecurityEventSeverity::Error),
            "critical" => Ok(SecurityEventSeverity::Critical),
            other => Err(format!("unknown severity: '{}'", other)),
        }
    }
}

impl SecurityEventType {
    pub fn default_severity(&self) -> SecurityEventSeverity {
        match self {
            SecurityEventType::AccessGranted
            | SecurityEventType::SessionOpened
            | SecurityEventType::SessionRefreshed
            | SecurityEventType::SessionClosed
            | SecurityEventType::DocumentUploaded
            | SecurityEventType::DocumentArchived
            | SecurityEventType::Custom(_) => SecurityEventSeverity::Info,

            SecurityEventType::WorkspaceNotRecognized
            | SecurityEventType::AuthenticationRequired => SecurityEventSeverity::Warning,

            SecurityEventType::AccessDenied => SecurityEventSeverity::Error,
        }
    }
}

/// A single audit record.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityEvent {
    pub id: String,
    /// Unix epoch milliseconds
    pub timestamp: u64,
    #[serde(serialize_with = "serialize_display")]
    pub event_type: SecurityEventType,
    #[serde(serialize_with = "serialize_display")]
    pub severity: SecurityEventSeverity,
    pub user_id: Option<String>,
    pub role: Option<Role>,
    pub workspace: Option<Workspace>,
    pub action: Option<Action>,
    pub path: Option<String>,
    pub details: BTreeMap<String, String>,
    pub reason: Option<String>,
}

fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: serde::Serializer,
{
    serializer.collect_str(value)
}

impl SecurityEvent {
    pub fn new(event_type: SecurityEventType) -> Self {
        Self {
            id: generate_event_id(),
            timestamp: now_millis(),
            severity: event_type.default_severity(),
            event_type,
            user_id: None,
            role: None,
            workspace: None,
            action: None,
            path: None,
            details: BTreeMap::new(),
            reason: None,
        }
    }

    pub fn user_id(mut self, id: impl Into<String>) -> Self {
        self.user_id = Some(id.into());
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn workspace(mut self, workspace: Workspace) -> Self {
        self.workspace = Some(workspace);
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the severity (overrides default).
    pub fn severity(mut self, severity: SecurityEventSeverity) -> Self {
        self.severity = severity;
        self
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    // Convenience constructors

    pub fn access_granted(user_id: &str, role: Role, action: Action, workspace: Workspace) -> Self {
        Self::new(SecurityEventType::AccessGranted)
            .user_id(user_id)
            .role(role)
            .action(action)
            .workspace(workspace)
    }

    pub fn access_denied(
        user_id: &str,
        role: Role,
        action: Action,
        workspace: Workspace,
        reason: DecisionReason,
    ) -> Self {
        Self::new(SecurityEventType::AccessDenied)
            .user_id(user_id)
            .role(role)
            .action(action)
            .workspace(workspace)
            .reason(reason.to_string())
    }

    /// Builds the event matching a router denial.
    pub fn from_denial(panel: &DenialPanel, user_id: Option<&str>, action: Action) -> Self {
        use crate::http::security::router::DenialKind;

        let event_type = match panel.kind {
            DenialKind::Unauthenticated => SecurityEventType::AuthenticationRequired,
            DenialKind::NotRecognized => SecurityEventType::WorkspaceNotRecognized,
            DenialKind::PermissionDenied => SecurityEventType::AccessDenied,
        };
        let mut event = Self::new(event_type)
            .action(action)
            .detail("requested", panel.requested.clone())
            .reason(panel.reason.to_string());
        if let Some(id) = user_id {
            event = event.user_id(id);
        }
        if let Some(role) = panel.role {
            event = event.role(role);
        }
        if let Some(workspace) = panel.workspace {
            event = event.workspace(workspace);
        }
        event
    }

    pub fn session_opened(user_id: &str, role: Role) -> Self {
        Self::new(SecurityEventType::SessionOpened)
            .user_id(user_id)
            .role(role)
    }

    pub fn session_refreshed(user_id: &str, role: Role) -> Self {
        Self::new(SecurityEventType::SessionRefreshed)
            .user_id(user_id)
            .role(role)
    }

    pub fn session_closed(user_id: &str) -> Self {
        Self::new(SecurityEventType::SessionClosed).user_id(user_id)
    }

    pub fn document_uploaded(user_id: &str, workspace: Workspace, document_id: u64) -> Self {
        Self::new(SecurityEventType::DocumentUploaded)
            .user_id(user_id)
            .workspace(workspace)
            .action(Action::Upload)
            .detail("document", document_id.to_string())
    }

    pub fn document_archived(user_id: &str, workspace: Workspace, document_id: u64) -> Self {
        Self::new(SecurityEventType::DocumentArchived)
            .user_id(user_id)
            .workspace(workspace)
            .action(Action::Archive)
            .detail("document", document_id.to_string())
    }

    /// Format the event as a log line.
    pub fn to_log_line(&self) -> String {
        let mut parts = vec![
            format!("[{}]", self.severity),
            format!("[{}]", self.event_type),
        ];

        if let Some(ref user_id) = self.user_id {
            parts.push(format!("user={}", user_id));
        }
        if let Some(role) = self.role {
            parts.push(format!("role={}", role));
        }
        if let Some(action) = self.action {
            parts.push(format!("action={}", action));
        }
        if let Some(workspace) = self.workspace {
            parts.push(format!("workspace={}", workspace));
        }
        if let Some(ref path) = self.path {
            parts.push(format!("path={}", path));
        }
        if let Some(ref reason) = self.reason {
            parts.push(format!("reason=\"{}\"", reason));
        }
        for (k, v) in &self.details {
            parts.push(format!("{}={}", k, v));
        }

        parts.join(" ")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.to_log_line())
    }
}

fn generate_event_id() -> String {
    use rand::Rng;
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    let random: u32 = rand::thread_rng().gen();
    format!("{:x}-{:08x}", timestamp, random)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

pub trait SecurityEventHandler: Send + Sync {
    fn handle(&self, event: &SecurityEvent);
}

/// Forwards events to `tracing`, mapping severity to level.
#[derive(Debug, Default)]
pub struct TracingHandler {
    min_severity: SecurityEventSeverity,
}

impl TracingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_severity(mut self, severity: SecurityEventSeverity) -> Self {
        self.min_severity = severity;
        self
    }
}

impl SecurityEventHandler for TracingHandler {
    fn handle(&self, event: &SecurityEvent) {
        if event.severity < self.min_severity {
            return;
        }
        let line = event.to_log_line();
        match event.severity {
            SecurityEventSeverity::Info => {
                tracing::info!(target: "lisadocs::audit", event_id = %event.id, "{}", line)
            }
            SecurityEventSeverity::Warning => {
                tracing::warn!(target: "lisadocs::audit", event_id = %event.id, "{}", line)
            }
            SecurityEventSeverity::Error | SecurityEventSeverity::Critical => {
                tracing::error!(target: "lisadocs::audit", event_id = %event.id, "{}", line)
            }
        }
    }
}

pub struct ClosureHandler<F>
where
    F: Fn(&SecurityEvent) + Send + Sync,
{
    handler: F,
}

impl<F> ClosureHandler<F>
where
    F: Fn(&SecurityEvent) + Send + Sync,
{
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<F> SecurityEventHandler for ClosureHandler<F>
where
    F: Fn(&SecurityEvent) + Send + Sync,
{
    fn handle(&self, event: &SecurityEvent) {
        (self.handler)(event);
    }
}

/// Bounded in-memory event store, oldest events dropped first.
#[derive(Clone)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<Vec<SecurityEvent>>>,
    max_events: usize,
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            max_events: 10000,
        }
    }

    pub fn max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    pub fn get_events(&self) -> Vec<SecurityEvent> {
        self.read().clone()
    }

    pub fn get_events_by_type(&self, event_type: &SecurityEventType) -> Vec<SecurityEvent> {
        self.read()
            .iter()
            .filter(|e| &e.event_type == event_type)
            .cloned()
            .collect()
    }

    pub fn get_events_by_user(&self, user_id: &str) -> Vec<SecurityEvent> {
        self.read()
            .iter()
            .filter(|e| e.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.events
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<SecurityEvent>> {
        self.events.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SecurityEventHandler for InMemoryEventStore {
    fn handle(&self, event: &SecurityEvent) {
        let mut guard = self
            .events
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.push(event.clone());
        if guard.len() > self.max_events {
            let overflow = guard.len() - self.max_events;
            guard.drain(..overflow);
        }
    }
}

#[derive(Clone)]
pub struct AuditLogger {
    handlers: Arc<Vec<Arc<dyn SecurityEventHandler>>>,
    enabled: bool,
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditLogger {
    /// Create a new audit logger with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
            enabled: true,
        }
    }

    /// Create an audit logger writing through `tracing`.
    pub fn with_tracing() -> Self {
        Self::new().add_handler(TracingHandler::new())
    }

    pub fn add_handler<H: SecurityEventHandler + 'static>(mut self, handler: H) -> Self {
        let handlers = Arc::make_mut(&mut self.handlers);
        handlers.push(Arc::new(handler));
        self
    }

    pub fn with_handler<F>(self, handler: F) -> Self
    where
        F: Fn(&SecurityEvent) + Send + Sync + 'static,
    {
        self.add_handler(ClosureHandler::new(handler))
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn log(&self, event: SecurityEvent) {
        if !self.enabled {
            return;
        }

        for handler in self.handlers.iter() {
            handler.handle(&event);
        }
    }
}

static GLOBAL_LOGGER: OnceLock<AuditLogger> = OnceLock::new();

/// Installs the process-wide audit logger. Later calls are ignored.
pub fn init_global_logger(logger: AuditLogger) {
    let _ = GLOBAL_LOGGER.set(logger);
}

pub fn global_logger() -> &'static AuditLogger {
    GLOBAL_LOGGER.get_or_init(AuditLogger::new)
}

pub fn audit_log(event: SecurityEvent) {
    global_logger().log(event);
}

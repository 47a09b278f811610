//! Role and workspace access control.
//!
//! # Module Structure
//!
//! - `role` - The eight organizational roles
//! - `workspace` - The five workspaces and segment normalization
//! - `permissions` - Backend-issued per-workspace grants
//! - `table` - Static role policy table (scope and workspace ownership)
//! - `resolver` - Access decisions (AccessResolver)
//! - `router` - Navigation decisions and denial panels (WorkspaceRouter)
//! - `dashboard` - Per-workspace dashboard shell and document scope
//! - `document` - Document service contract and in-memory implementation
//! - `session` - Bearer-token session registry
//! - `config` - Core traits (Authenticator, Authorizer)
//! - `authorizer` - Path based workspace authorization (WorkspaceAuthorizer)
//! - `middleware` - Security middleware (SecurityTransform)
//! - `extractor` - Actix Web extractors (AuthenticatedUser, OptionalUser)
//! - `context` - Task-local access to the current user
//! - `audit` - Access audit log
//! - `manager` - Factory methods (AuthenticationManager, AuthorizationManager)

// Re-exports for convenience
pub use audit::{
    audit_log, global_logger, init_global_logger, AuditLogger, InMemoryEventStore,
    SecurityEvent, SecurityEventHandler, SecurityEventSeverity, SecurityEventType, TracingHandler,
};
pub use authorizer::WorkspaceAuthorizer;
pub use config::{Authenticator, Authorizer};
pub use context::SecurityContext;
pub use dashboard::{DashboardShell, DocumentScope, RowActions};
pub use document::{
    Document, DocumentError, DocumentPage, DocumentQuery, DocumentService, DocumentStatus,
    InMemoryDocumentService, NewDocument,
};
pub use extractor::{AuthenticatedUser, OptionalUser, SecurityExt};
pub use manager::{AuthenticationManager, AuthorizationManager};
pub use permissions::Permissions;
pub use resolver::{AccessDecision, AccessResolver, Action, Decision, DecisionReason, UnknownAction};
pub use role::{role_options, Role, SelectOption, UnknownRole};
pub use router::{DenialKind, DenialPanel, RouteDecision, WorkspaceRouter};
pub use session::SessionRegistry;
pub use user::{ProfileError, User, UserProfile};
pub use workspace::{workspace_options, UnknownWorkspace, Workspace};

// Internal modules
mod config;
mod extractor;
mod user;

// Public modules
pub mod audit;
pub mod authorizer;
pub mod context;
pub mod dashboard;
pub mod document;
pub mod manager;
pub mod middleware;
pub mod permissions;
pub mod resolver;
pub mod role;
pub mod router;
pub mod session;
pub mod table;
pub mod workspace;

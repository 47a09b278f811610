//! Path based workspace authorization.
//!
//! Requests are matched against an ordered list of patterns. Workspace
//! patterns capture the workspace segment in their first group and name the
//! action the request needs; the router then decides. Role patterns guard
//! paths that are not tied to a workspace. Unmatched paths pass through.

use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::Method;
use actix_web::{Error, HttpResponse, ResponseError};
use futures_util::future::LocalBoxFuture;
use regex::Regex;
use serde_json::json;

use crate::http::error::AuthError;
use crate::http::security::audit::{AuditLogger, SecurityEvent, SecurityEventType};
use crate::http::security::config::Authorizer;
use crate::http::security::resolver::Action;
use crate::http::security::role::Role;
use crate::http::security::router::{RouteDecision, WorkspaceRouter};
use crate::http::security::user::User;

#[derive(Clone)]
struct WorkspaceMatcher {
    method: Option<Method>,
    regex: Regex,
    action: Action,
}

#[derive(Clone)]
struct RoleMatcher {
    regex: Regex,
    roles: Vec<Role>,
}

/// Authorizes workspace paths through the [`WorkspaceRouter`].
///
/// # Example
/// ```
/// use actix_web::http::Method;
/// use lisadocs_core::http::security::authorizer::WorkspaceAuthorizer;
/// use lisadocs_core::http::security::{Action, Role};
///
/// let authorizer = WorkspaceAuthorizer::new()
///     .add_method_matcher(Method::POST, r"^/workspaces/([^/]+)/documents/?$", Action::Upload)
///     .and_then(|a| a.add_matcher(r"^/workspaces/([^/]+)(/.*)?$", Action::View))
///     .and_then(|a| a.add_role_matcher(r"^/admin(/.*)?$", &[Role::Administrador]))
///     .unwrap();
///
/// assert_eq!(authorizer.matched_action(&Method::GET, "/workspaces/cam"), Some(("cam".to_string(), Action::View)));
/// assert_eq!(authorizer.matched_action(&Method::GET, "/health"), None);
/// ```
#[derive(Clone)]
pub struct WorkspaceAuthorizer {
    router: WorkspaceRouter,
    workspace_matchers: Vec<WorkspaceMatcher>,
    role_matchers: Vec<RoleMatcher>,
    audit: AuditLogger,
}

impl WorkspaceAuthorizer {
    pub fn new() -> Self {
        WorkspaceAuthorizer {
            router: WorkspaceRouter::new(),
            workspace_matchers: Vec::new(),
            role_matchers: Vec::new(),
            audit: AuditLogger::new(),
        }
    }

    /// Adds a workspace pattern for every method. Group 1 must capture the
    /// workspace segment.
    pub fn add_matcher(self, pattern: &str, action: Action) -> Result<Self, regex::Error> {
        self.push_matcher(None, pattern, action)
    }

    /// Adds a workspace pattern that only applies to `method`.
    pub fn add_method_matcher(
        self,
        method: Method,
        pattern: &str,
        action: Action,
    ) -> Result<Self, regex::Error> {
        self.push_matcher(Some(method), pattern, action)
    }

    /// Restricts paths matching `pattern` to the given roles.
    pub fn add_role_matcher(mut self, pattern: &str, roles: &[Role]) -> Result<Self, regex::Error> {
        self.role_matchers.push(RoleMatcher {
            regex: Regex::new(pattern)?,
            roles: roles.to_vec(),
        });
        Ok(self)
    }

    pub fn audit_logger(mut self, logger: AuditLogger) -> Self {
        self.audit = logger;
        self
    }

    fn push_matcher(
        mut self,
        method: Option<Method>,
        pattern: &str,
        action: Action,
    ) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        if regex.captures_len() < 2 {
            tracing::warn!(pattern = %pattern, "workspace pattern has no capture group, it will never match");
        }
        self.workspace_matchers.push(WorkspaceMatcher {
            method,
            regex,
            action,
        });
        Ok(self)
    }

    /// First workspace pattern matching the request: the captured segment and
    /// the action it needs.
    ///
    /// The segment is percent-decoded the same way path extractors see it. A
    /// segment that is not valid UTF-8 once decoded is kept raw and will not
    /// name a workspace.
    pub fn matched_action(&self, method: &Method, path: &str) -> Option<(String, Action)> {
        self.workspace_matchers
            .iter()
            .filter(|m| m.method.as_ref().map_or(true, |wanted| wanted == method))
            .find_map(|m| {
                let raw = m.regex.captures(path)?.get(1)?.as_str();
                let segment = urlencoding::decode(raw)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|_| raw.to_string());
                Some((segment, m.action))
            })
    }

    fn matched_roles(&self, path: &str) -> Option<&[Role]> {
        self.role_matchers
            .iter()
            .find(|m| m.regex.is_match(path))
            .map(|m| m.roles.as_slice())
    }

    /// Resolves a workspace request, auditing the outcome.
    pub fn decide(&self, user: Option<&User>, segment: &str, action: Action, path: &str) -> RouteDecision {
        let decision = self.router.route_action(user, segment, action);
        let event = match &decision {
            RouteDecision::Granted(workspace) => {
                let user = user.map(|u| (u.get_id(), u.get_role()));
                match user {
                    Some((id, role)) => SecurityEvent::access_granted(id, role, action, *workspace),
                    None => SecurityEvent::new(SecurityEventType::AccessGranted).workspace(*workspace),
                }
            }
            RouteDecision::Denied(panel) => {
                tracing::debug!(path = %path, kind = ?panel.kind, "workspace request denied");
                SecurityEvent::from_denial(panel, user.map(User::get_id), action)
            }
        };
        self.audit.log(event.path(path));
        decision
    }

    fn role_response(&self, user: Option<&User>, roles: &[Role], path: &str) -> Option<HttpResponse> {
        let names: Vec<&str> = roles.iter().map(|r| r.as_str()).collect();
        match user {
            Some(u) if u.has_any_role(roles) => None,
            Some(u) => {
                self.audit.log(
                    SecurityEvent::new(SecurityEventType::AccessDenied)
                        .user_id(u.get_id())
                        .role(u.get_role())
                        .path(path)
                        .reason(format!("requires one of: {}", names.join(", "))),
                );
                Some(HttpResponse::Forbidden().json(json!({
                    "error": format!("role {} may not open {}", u.get_role().label(), path),
                    "requiredRoles": names,
                })))
            }
            None => {
                self.audit.log(
                    SecurityEvent::new(SecurityEventType::AuthenticationRequired).path(path),
                );
                Some(HttpResponse::Unauthorized().json(json!({
                    "error": format!("sign in to open {}", path),
                    "requiredRoles": names,
                })))
            }
        }
    }
}

impl Default for WorkspaceAuthorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: 'static> Authorizer<B> for WorkspaceAuthorizer {
    fn process(
        &self,
        req: ServiceRequest,
        user: Option<&User>,
        next: impl FnOnce(ServiceRequest) -> LocalBoxFuture<'static, Result<ServiceResponse<B>, Error>>
            + 'static,
    ) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
        let path = req.path().to_string();

        if let Some(roles) = self.matched_roles(&path) {
            if let Some(response) = self.role_response(user, roles, &path) {
                return Box::pin(async move { Ok(req.into_response(response.map_into_right_body())) });
            }
        }

        if let Some((segment, action)) = self.matched_action(req.method(), &path) {
            if let RouteDecision::Denied(panel) = self.decide(user, &segment, action, &path) {
                let response = AuthError::from_panel(panel).error_response();
                return Box::pin(async move { Ok(req.into_response(response.map_into_right_body())) });
            }
        }

        Box::pin(async move {
            let res = next(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

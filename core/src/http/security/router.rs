//! Workspace navigation decisions.
//!
//! Each navigation event is resolved from scratch: the requested segment is
//! normalized, the resolver is consulted, and the outcome is either the
//! workspace whose dashboard should be shown or a denial panel. Denials
//! always list the workspaces the user can open instead.

use std::fmt;

use serde::Serialize;

use crate::http::security::resolver::{AccessResolver, Action, DecisionReason};
use crate::http::security::role::Role;
use crate::http::security::user::User;
use crate::http::security::workspace::Workspace;

/// Kind of denial shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    NotRecognized,
    PermissionDenied,
}

/// Informational panel rendered in place of a dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DenialPanel {
    pub kind: DenialKind,
    /// Segment as requested by the navigation event.
    pub requested: String,
    /// Resolved workspace, when the segment named one.
    pub workspace: Option<Workspace>,
    pub role: Option<Role>,
    pub reason: DecisionReason,
    pub available: Vec<Workspace>,
    pub message: String,
}

impl DenialPanel {
    fn new(
        kind: DenialKind,
        requested: &str,
        workspace: Option<Workspace>,
        user: Option<&User>,
        reason: DecisionReason,
        available: Vec<Workspace>,
    ) -> Self {
        let role = user.map(User::get_role);
        let message = compose_message(kind, requested, workspace, role, reason, &available);
        DenialPanel {
            kind,
            requested: requested.to_string(),
            workspace,
            role,
            reason,
            available,
            message,
        }
    }
}

impl fmt::Display for DenialPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

fn compose_message(
    kind: DenialKind,
    requested: &str,
    workspace: Option<Workspace>,
    role: Option<Role>,
    reason: DecisionReason,
    available: &[Workspace],
) -> String {
    let target = workspace.map(Workspace::label).unwrap_or(requested);
    let headline = match (kind, role) {
        (DenialKind::Unauthenticated, _) | (_, None) => {
            format!("Sign in to open the workspace '{}'.", target)
        }
        (DenialKind::NotRecognized, Some(role)) => format!(
            "The workspace '{}' is not recognized (current role: {}).",
            target,
            role.label()
        ),
        (DenialKind::PermissionDenied, Some(role)) => format!(
            "Access to '{}' denied for role {}: {}.",
            target,
            role.label(),
            reason
        ),
    };

    if available.is_empty() {
        format!("{} No workspaces are available to this account.", headline)
    } else {
        let names: Vec<&str> = available.iter().map(|w| w.label()).collect();
        format!("{} Available workspaces: {}.", headline, names.join(", "))
    }
}

/// Outcome of one navigation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Granted(Workspace),
    Denied(DenialPanel),
}

impl RouteDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, RouteDecision::Granted(_))
    }

    pub fn workspace(&self) -> Option<Workspace> {
        match self {
            RouteDecision::Granted(workspace) => Some(*workspace),
            RouteDecision::Denied(panel) => panel.workspace,
        }
    }
}

/// Chooses between a workspace dashboard and a denial panel.
///
/// # Example
/// ```
/// use lisadocs_core::http::security::{Role, RouteDecision, User, Workspace, WorkspaceRouter};
///
/// let router = WorkspaceRouter::new();
/// let user = User::new("1", Role::CfMember);
///
/// assert_eq!(router.route(Some(&user), "comisiones"), RouteDecision::Granted(Workspace::ComisionesCf));
/// assert!(!router.route(Some(&user), "presidencia").is_granted());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkspaceRouter {
    resolver: AccessResolver,
}

impl WorkspaceRouter {
    pub fn new() -> Self {
        WorkspaceRouter {
            resolver: AccessResolver::new(),
        }
    }

    pub fn resolver(&self) -> &AccessResolver {
        &self.resolver
    }

    /// Resolves a navigation request to a workspace.
    pub fn route(&self, user: Option<&User>, requested: &str) -> RouteDecision {
        self.route_action(user, requested, Action::View)
    }

    /// Resolves a navigation request that also needs `action` on the target
    /// workspace (an upload form, an archive button).
    pub fn route_action(&self, user: Option<&User>, requested: &str, action: Action) -> RouteDecision {
        let workspace = Workspace::from_segment(requested);
        let available = self.resolver.accessible_workspaces(user);

        if user.is_none() {
            return RouteDecision::Denied(DenialPanel::new(
                DenialKind::Unauthenticated,
                requested,
                workspace,
                None,
                DecisionReason::Unauthenticated,
                available,
            ));
        }

        let workspace = match workspace {
            Some(workspace) => workspace,
            None => {
                return RouteDecision::Denied(DenialPanel::new(
                    DenialKind::NotRecognized,
                    requested,
                    None,
                    user,
                    DecisionReason::UnknownWorkspace,
                    available,
                ))
            }
        };

        let view = self.resolver.decide(user, Action::View, workspace);
        let decision = if view.allowed && action != Action::View {
            self.resolver.decide(user, action, workspace)
        } else {
            view
        };

        if decision.allowed {
            RouteDecision::Granted(workspace)
        } else {
            RouteDecision::Denied(DenialPanel::new(
                DenialKind::PermissionDenied,
                requested,
                Some(workspace),
                user,
                decision.reason,
                available,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::security::permissions::Permissions;

    fn denied(decision: RouteDecision) -> DenialPanel {
        match decision {
            RouteDecision::Denied(panel) => panel,
            RouteDecision::Granted(workspace) => panic!("unexpectedly granted {}", workspace),
        }
    }

    #[test]
    fn test_granted_with_alias() {
        let router = WorkspaceRouter::new();
        let user = User::new("1", Role::SecretarioCf);
        assert_eq!(
            router.route(Some(&user), "Comisiones"),
            RouteDecision::Granted(Workspace::ComisionesCf)
        );
    }

    #[test]
    fn test_unknown_workspace_lists_available_for_every_role() {
        let router = WorkspaceRouter::new();
        for role in Role::ALL {
            let user = User::new("1", role);
            let panel = denied(router.route(Some(&user), "unknown_ws"));

            assert_eq!(panel.kind, DenialKind::NotRecognized);
            assert_eq!(panel.reason, DecisionReason::UnknownWorkspace);
            assert_eq!(panel.workspace, None);
            assert_eq!(panel.role, Some(role));
            assert_eq!(
                panel.available,
                router.resolver().accessible_workspaces(Some(&user))
            );
            assert!(panel.message.contains("unknown_ws"));
            assert!(panel.message.contains("not recognized"));
        }
    }

    #[test]
    fn test_permission_denied_panel() {
        let router = WorkspaceRouter::new();
        let user = User::new("1", Role::SecretarioCam)
            .permissions(Permissions::new().view(&[Workspace::Cam, Workspace::Ampp]));

        let panel = denied(router.route(Some(&user), "ampp"));
        assert_eq!(panel.kind, DenialKind::PermissionDenied);
        assert_eq!(panel.workspace, Some(Workspace::Ampp));
        assert_eq!(panel.available, vec![Workspace::Cam]);
        assert_eq!(
            panel.message,
            "Access to 'AMPP' denied for role Secretario CAM: this role is limited to the CAM \
             workspace. Available workspaces: CAM."
        );
    }

    #[test]
    fn test_unauthenticated_panel() {
        let router = WorkspaceRouter::new();
        let panel = denied(router.route(None, "cam"));
        assert_eq!(panel.kind, DenialKind::Unauthenticated);
        assert_eq!(panel.role, None);
        assert!(panel.available.is_empty());
        assert!(panel.message.contains("No workspaces are available"));

        let panel = denied(router.route(None, "unknown_ws"));
        assert_eq!(panel.kind, DenialKind::Unauthenticated);
    }

    #[test]
    fn test_route_action_requires_action() {
        let router = WorkspaceRouter::new();
        let member = User::new("1", Role::CfMember);

        assert!(router
            .route_action(Some(&member), "comisiones_cf", Action::View)
            .is_granted());

        let panel = denied(router.route_action(Some(&member), "comisiones_cf", Action::Archive));
        assert_eq!(panel.kind, DenialKind::PermissionDenied);
        assert_eq!(panel.reason, DecisionReason::PermissionMissing);
        assert_eq!(panel.available, vec![Workspace::ComisionesCf]);
    }

    #[test]
    fn test_foreign_workspace_reports_restriction_not_action() {
        let router = WorkspaceRouter::new();
        let secretary = User::new("1", Role::SecretarioAmpp);
        let panel = denied(router.route_action(Some(&secretary), "cam", Action::Upload));
        assert_eq!(
            panel.reason,
            DecisionReason::RestrictedToWorkspace(Workspace::Ampp)
        );
    }

    #[test]
    fn test_every_navigation_restarts() {
        let router = WorkspaceRouter::new();
        let admin = User::new("1", Role::Administrador);
        let member = User::new("2", Role::CfMember);

        assert!(router.route(Some(&admin), "presidencia").is_granted());
        assert!(!router.route(Some(&member), "presidencia").is_granted());
        assert!(router.route(Some(&admin), "presidencia").is_granted());
    }

    #[test]
    fn test_panel_serializes() {
        let router = WorkspaceRouter::new();
        let user = User::new("1", Role::Intendente);
        let panel = denied(router.route(Some(&user), "intendencia"));
        let json = serde_json::to_value(&panel).unwrap();

        assert_eq!(json["kind"], "permission_denied");
        assert_eq!(json["role"], "intendente");
        assert_eq!(json["available"], serde_json::json!(["cam"]));
        assert_eq!(json["reason"]["rule"], "restricted_to_workspace");
        assert_eq!(json["reason"]["workspace"], "cam");
    }
}

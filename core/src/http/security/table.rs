//! Role to workspace-capability table.
//!
//! The single authored source of truth for what each role may do before the
//! backend-issued grants are consulted. Every other module reads it through
//! [`policy_for`], [`workspace_owner`] and [`sees_all_documents`].

use crate::http::security::role::Role;
use crate::http::security::workspace::Workspace;

/// How far a role's reach extends across workspaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleScope {
    /// Every action on every workspace; the permission arrays are ignored.
    Unrestricted,
    /// Only this workspace; grants naming any other workspace are ignored.
    RestrictedTo(Workspace),
    /// No role-level rule; the permission arrays decide.
    Delegated,
}

/// Default capability set of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolePolicy {
    pub scope: RoleScope,
    /// Workspace the role is the secretary of (may upload there).
    pub owned_workspace: Option<Workspace>,
}

impl RolePolicy {
    /// Policy of a role with no entry: nothing beyond the permission arrays.
    pub const NONE: RolePolicy = RolePolicy {
        scope: RoleScope::Delegated,
        owned_workspace: None,
    };

    const fn unrestricted() -> Self {
        RolePolicy {
            scope: RoleScope::Unrestricted,
            owned_workspace: None,
        }
    }

    const fn restricted(workspace: Workspace) -> Self {
        RolePolicy {
            scope: RoleScope::RestrictedTo(workspace),
            owned_workspace: None,
        }
    }

    const fn secretary(workspace: Workspace) -> Self {
        RolePolicy {
            scope: RoleScope::RestrictedTo(workspace),
            owned_workspace: Some(workspace),
        }
    }
}

pub const ROLE_POLICIES: &[(Role, RolePolicy)] = &[
    (Role::Administrador, RolePolicy::unrestricted()),
    (Role::Presidente, RolePolicy::unrestricted()),
    (Role::Vicepresidente, RolePolicy::unrestricted()),
    (Role::Intendente, RolePolicy::restricted(Workspace::Cam)),
    (Role::SecretarioCam, RolePolicy::secretary(Workspace::Cam)),
    (Role::SecretarioAmpp, RolePolicy::secretary(Workspace::Ampp)),
    (Role::SecretarioCf, RolePolicy::secretary(Workspace::ComisionesCf)),
    (Role::CfMember, RolePolicy::restricted(Workspace::ComisionesCf)),
];

/// Looks up the policy of a role. A role without an entry gets
/// [`RolePolicy::NONE`].
pub fn policy_for(role: Role) -> RolePolicy {
    ROLE_POLICIES
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, policy)| *policy)
        .unwrap_or(RolePolicy::NONE)
}

/// The secretary role owning a workspace, if any.
pub fn workspace_owner(workspace: Workspace) -> Option<Role> {
    ROLE_POLICIES
        .iter()
        .find(|(_, policy)| policy.owned_workspace == Some(workspace))
        .map(|(role, _)| *role)
}

/// Whether `role` lists every document of `workspace` rather than only the
/// ones the user created.
pub fn sees_all_documents(role: Role, workspace: Workspace) -> bool {
    match policy_for(role).scope {
        RoleScope::Unrestricted => true,
        _ => workspace_owner(workspace) == Some(role),
    }
}

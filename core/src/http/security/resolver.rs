//! Workspace and document-action access resolution.
//!
//! Rules, highest precedence first (first match wins):
//!
//! 1. No user: deny.
//! 2. `administrador`: allow.
//! 3. `presidente` / `vicepresidente`: allow on every workspace.
//! 4. Roles restricted to one workspace: deny on every other workspace,
//!    whatever the permission arrays say.
//! 5. Otherwise the backend arrays decide (`canView`, `canManage`,
//!    `canArchive`). A restricted role may always view its own workspace.
//! 6. `upload` is allowed by a `manage` grant or by being the workspace's
//!    secretary.
//!
//! Every function here is total and pure: no input makes it panic and no
//! call observes or changes shared state.

use std::fmt;
use std::str::FromStr;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::http::security::table::{policy_for, RoleScope};
use crate::http::security::user::User;
use crate::http::security::workspace::Workspace;

/// A named permitted action on a workspace's documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Upload,
    Archive,
    Manage,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::View, Action::Upload, Action::Archive, Action::Manage];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Upload => "upload",
            Action::Archive => "archive",
            Action::Manage => "manage",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("unknown action: '{value}'")]
pub struct UnknownAction {
    pub value: String,
}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Action::ALL
            .iter()
            .copied()
            .find(|a| a.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownAction {
                value: s.to_string(),
            })
    }
}

/// Why a decision came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", content = "workspace", rename_all = "snake_case")]
pub enum DecisionReason {
    Unauthenticated,
    UnknownWorkspace,
    Administrator,
    Executive,
    RestrictedToWorkspace(Workspace),
    HomeWorkspace,
    WorkspaceOwner,
    PermissionGranted,
    PermissionMissing,
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionReason::Unauthenticated => write!(f, "no authenticated session"),
            DecisionReason::UnknownWorkspace => write!(f, "the workspace is not recognized"),
            DecisionReason::Administrator => write!(f, "administrators may do everything"),
            DecisionReason::Executive => {
                write!(f, "the presidency has full access to every workspace")
            }
            DecisionReason::RestrictedToWorkspace(home) => {
                write!(f, "this role is limited to the {} workspace", home.label())
            }
            DecisionReason::HomeWorkspace => write!(f, "this is the role's own workspace"),
            DecisionReason::WorkspaceOwner => write!(f, "the role is the workspace secretary"),
            DecisionReason::PermissionGranted => write!(f, "granted by the user's permissions"),
            DecisionReason::PermissionMissing => {
                write!(f, "the user's permissions do not include it")
            }
        }
    }
}

/// An allow/deny outcome with the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub allowed: bool,
    pub reason: DecisionReason,
}

impl Decision {
    fn allow(reason: DecisionReason) -> Self {
        Decision {
            allowed: true,
            reason,
        }
    }

    fn deny(reason: DecisionReason) -> Self {
        Decision {
            allowed: false,
            reason,
        }
    }
}

/// Per (user, workspace) capability flags. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecision {
    pub can_view: bool,
    pub can_upload: bool,
    pub can_archive: bool,
    pub can_manage: bool,
}

impl AccessDecision {
    /// The flag for a single action.
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::View => self.can_view,
            Action::Upload => self.can_upload,
            Action::Archive => self.can_archive,
            Action::Manage => self.can_manage,
        }
    }
}

/// Stateless access resolver.
///
/// # Example
/// ```
/// use lisadocs_core::http::security::{AccessResolver, Action, Permissions, Role, User, Workspace};
///
/// let resolver = AccessResolver::new();
/// let user = User::new("1", Role::SecretarioCam)
///     .permissions(Permissions::new().view(&[Workspace::Cam, Workspace::Ampp]));
///
/// assert!(resolver.can_access_workspace(Some(&user), Workspace::Cam));
/// // The hard restriction wins over the broader grant.
/// assert!(!resolver.can_access_workspace(Some(&user), Workspace::Ampp));
/// assert!(resolver.can_perform(Some(&user), Action::Upload, Workspace::Cam));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessResolver;

impl AccessResolver {
    pub fn new() -> Self {
        AccessResolver
    }

    /// Whether the user may open the workspace at all (the `view` action).
    pub fn can_access_workspace(&self, user: Option<&User>, workspace: Workspace) -> bool {
        self.can_perform(user, Action::View, workspace)
    }

    /// Same as [`can_access_workspace`](Self::can_access_workspace) for a raw
    /// identifier. Unknown identifiers are denied.
    pub fn can_access_workspace_id(&self, user: Option<&User>, workspace: &str) -> bool {
        self.can_perform_id(user, Action::View, workspace)
    }

    pub fn can_perform(&self, user: Option<&User>, action: Action, workspace: Workspace) -> bool {
        self.decide(user, action, workspace).allowed
    }

    /// Same as [`can_perform`](Self::can_perform) for a raw identifier.
    pub fn can_perform_id(&self, user: Option<&User>, action: Action, workspace: &str) -> bool {
        self.decide_id(user, action, workspace).allowed
    }

    /// Resolves one action and reports the rule that decided it.
    pub fn decide(&self, user: Option<&User>, action: Action, workspace: Workspace) -> Decision {
        let user = match user {
            Some(user) => user,
            None => return Decision::deny(DecisionReason::Unauthenticated),
        };
        let role = user.get_role();
        let policy = policy_for(role);

        match policy.scope {
            RoleScope::Unrestricted if role.is_executive() => {
                return Decision::allow(DecisionReason::Executive)
            }
            RoleScope::Unrestricted => return Decision::allow(DecisionReason::Administrator),
            RoleScope::RestrictedTo(home) if home != workspace => {
                return Decision::deny(DecisionReason::RestrictedToWorkspace(home))
            }
            RoleScope::RestrictedTo(_) if action == Action::View => {
                return Decision::allow(DecisionReason::HomeWorkspace)
            }
            RoleScope::RestrictedTo(_) | RoleScope::Delegated => {}
        }

        let permissions = user.get_permissions();
        match action {
            Action::Upload => {
                if permissions.grants(Action::Manage, workspace) {
                    Decision::allow(DecisionReason::PermissionGranted)
                } else if policy.owned_workspace == Some(workspace) {
                    Decision::allow(DecisionReason::WorkspaceOwner)
                } else {
                    Decision::deny(DecisionReason::PermissionMissing)
                }
            }
            _ if permissions.grants(action, workspace) => {
                Decision::allow(DecisionReason::PermissionGranted)
            }
            _ => Decision::deny(DecisionReason::PermissionMissing),
        }
    }

    /// [`decide`](Self::decide) for a raw identifier.
    pub fn decide_id(&self, user: Option<&User>, action: Action, workspace: &str) -> Decision {
        if user.is_none() {
            return Decision::deny(DecisionReason::Unauthenticated);
        }
        match workspace.parse::<Workspace>() {
            Ok(workspace) => self.decide(user, action, workspace),
            Err(_) => Decision::deny(DecisionReason::UnknownWorkspace),
        }
    }

    /// All four capability flags for one workspace.
    pub fn access_decision(&self, user: Option<&User>, workspace: Workspace) -> AccessDecision {
        AccessDecision {
            can_view: self.can_perform(user, Action::View, workspace),
            can_upload: self.can_perform(user, Action::Upload, workspace),
            can_archive: self.can_perform(user, Action::Archive, workspace),
            can_manage: self.can_perform(user, Action::Manage, workspace),
        }
    }

    /// Workspaces the user may open, in enumeration order.
    pub fn accessible_workspaces(&self, user: Option<&User>) -> Vec<Workspace> {
        Workspace::ALL
            .iter()
            .copied()
            .filter(|w| self.can_access_workspace(user, *w))
            .collect()
    }
}

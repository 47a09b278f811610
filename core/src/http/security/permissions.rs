//! Backend-issued permission grants.
//!
//! The backend attaches `{ canView, canManage?, canArchive? }` to the user
//! profile. Arrays that are missing default to empty and identifiers that
//! do not name a known workspace are dropped, so a malformed payload can
//! only ever narrow access.

use serde::{Deserialize, Deserializer, Serialize};

use crate::http::security::resolver::Action;
use crate::http::security::workspace::Workspace;

/// Typed capability record with explicit empty defaults.
///
/// # Example
/// ```
/// use lisadocs_core::http::security::{Action, Permissions, Workspace};
///
/// let permissions: Permissions =
///     serde_json::from_str(r#"{"canView": ["cam", "nowhere"]}"#).unwrap();
///
/// assert!(permissions.grants(Action::View, Workspace::Cam));
/// assert!(!permissions.grants(Action::Manage, Workspace::Cam));
/// assert_eq!(permissions.can_view.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub can_view: Vec<Workspace>,
    pub can_manage: Vec<Workspace>,
    pub can_archive: Vec<Workspace>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawPermissions {
    can_view: Option<Vec<String>>,
    can_manage: Option<Vec<String>>,
    can_archive: Option<Vec<String>>,
}

impl Permissions {
    /// Creates an empty permission record (denies everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds workspaces to the view grant (builder pattern).
    pub fn view(mut self, workspaces: &[Workspace]) -> Self {
        extend_unique(&mut self.can_view, workspaces.iter().copied());
        self
    }

    /// Adds workspaces to the manage grant (builder pattern).
    pub fn manage(mut self, workspaces: &[Workspace]) -> Self {
        extend_unique(&mut self.can_manage, workspaces.iter().copied());
        self
    }

    /// Adds workspaces to the archive grant (builder pattern).
    pub fn archive(mut self, workspaces: &[Workspace]) -> Self {
        extend_unique(&mut self.can_archive, workspaces.iter().copied());
        self
    }

    /// Checks whether the arrays grant `action` on `workspace`.
    ///
    /// Upload has no array of its own and is never granted here.
    pub fn grants(&self, action: Action, workspace: Workspace) -> bool {
        match action {
            Action::View => self.can_view.contains(&workspace),
            Action::Manage => self.can_manage.contains(&workspace),
            Action::Archive => self.can_archive.contains(&workspace),
            Action::Upload => false,
        }
    }

    /// Returns true if no workspace is granted for any action.
    pub fn is_empty(&self) -> bool {
        self.can_view.is_empty() && self.can_manage.is_empty() && self.can_archive.is_empty()
    }

    fn from_raw(raw: RawPermissions) -> Self {
        let mut permissions = Permissions::new();
        extend_unique(&mut permissions.can_view, known(raw.can_view));
        extend_unique(&mut permissions.can_manage, known(raw.can_manage));
        extend_unique(&mut permissions.can_archive, known(raw.can_archive));
        permissions
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawPermissions>::deserialize(deserializer)?;
        Ok(raw.map(Permissions::from_raw).unwrap_or_default())
    }
}

fn known(values: Option<Vec<String>>) -> impl Iterator<Item = Workspace> {
    values
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| value.parse::<Workspace>().ok())
}

fn extend_unique(target: &mut Vec<Workspace>, workspaces: impl Iterator<Item = Workspace>) {
    for workspace in workspaces {
        if !target.contains(&workspace) {
            target.push(workspace);
        }
    }
}

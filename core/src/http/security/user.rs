//! User model for access resolution.
//!
//! A `User` is built once from the backend profile when the session is
//! loaded and replaced wholesale when the profile is re-fetched. Its role
//! never changes for the lifetime of the value.

use std::fmt;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::http::security::permissions::Permissions;
use crate::http::security::role::{Role, UnknownRole};

/// Represents an authenticated user with one role and backend-issued grants.
///
/// # Example
/// ```
/// use lisadocs_core::http::security::{Permissions, Role, User, Workspace};
///
/// let user = User::new("42", Role::SecretarioCam)
///     .username("mgarcia")
///     .permissions(Permissions::new().manage(&[Workspace::Cam]));
///
/// assert!(user.has_role(Role::SecretarioCam));
/// assert_eq!(user.get_username(), "mgarcia");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    id: String,
    username: String,
    role: Role,
    permissions: Permissions,
}

impl User {
    /// Creates a user with empty permissions. The username defaults to the id.
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        let id = id.into();
        User {
            username: id.clone(),
            id,
            role,
            permissions: Permissions::default(),
        }
    }

    /// Resolves a raw backend profile into a user.
    ///
    /// Fails when the role is not one of the known roles; callers must treat
    /// that as "no session".
    pub fn from_profile(profile: UserProfile) -> Result<Self, ProfileError> {
        let id = profile.id.trim().to_string();
        if id.is_empty() {
            return Err(ProfileError::MissingId);
        }
        let role = profile.role.parse::<Role>()?;
        let username = profile
            .username
            .or(profile.name)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| id.clone());

        Ok(User {
            id,
            username,
            role,
            permissions: profile.permissions.unwrap_or_default(),
        })
    }

    /// Sets the display username (builder pattern).
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Replaces the permission grants (builder pattern).
    pub fn permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Returns the backend user id.
    pub fn get_id(&self) -> &str {
        &self.id
    }

    /// Returns the username.
    pub fn get_username(&self) -> &str {
        &self.username
    }

    /// Returns the user's role.
    pub fn get_role(&self) -> Role {
        self.role
    }

    /// Returns the backend-issued permission grants.
    pub fn get_permissions(&self) -> &Permissions {
        &self.permissions
    }

    /// Checks if the user has a specific role.
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// Checks if the user has ANY of the specified roles (OR logic).
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User {{ id: {}, username: {}, role: {} }}",
            self.id, self.username, self.role
        )
    }
}

/// Raw `/auth/profile` payload as sent by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub role: String,
    #[serde(default)]
    pub permissions: Option<Permissions>,
}

/// Reasons a backend profile cannot become a session user.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ProfileError {
    #[display("profile has no user id")]
    MissingId,
    #[display("{_0}")]
    UnknownRole(UnknownRole),
}

impl From<UnknownRole> for ProfileError {
    fn from(err: UnknownRole) -> Self {
        ProfileError::UnknownRole(err)
    }
}

//! Roles assigned to LisaDocs users.
//!
//! Every user carries exactly one role. The set is closed; the backend
//! sends the lowercase identifier (`"secretario_cam"`, `"cf_member"`, ...).

use std::fmt;
use std::str::FromStr;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Job-function label determining a user's baseline capabilities.
///
/// # Example
/// ```
/// use lisadocs_core::http::security::Role;
///
/// let role: Role = "secretario_cam".parse().unwrap();
/// assert_eq!(role, Role::SecretarioCam);
/// assert_eq!(role.label(), "Secretario CAM");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Administrador,
    Presidente,
    Vicepresidente,
    SecretarioCam,
    SecretarioAmpp,
    SecretarioCf,
    Intendente,
    CfMember,
}

impl Role {
    /// All roles, in the order the administration forms list them.
    pub const ALL: [Role; 8] = [
        Role::Administrador,
        Role::Presidente,
        Role::Vicepresidente,
        Role::SecretarioCam,
        Role::SecretarioAmpp,
        Role::SecretarioCf,
        Role::Intendente,
        Role::CfMember,
    ];

    /// Backend identifier of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Administrador => "administrador",
            Role::Presidente => "presidente",
            Role::Vicepresidente => "vicepresidente",
            Role::SecretarioCam => "secretario_cam",
            Role::SecretarioAmpp => "secretario_ampp",
            Role::SecretarioCf => "secretario_cf",
            Role::Intendente => "intendente",
            Role::CfMember => "cf_member",
        }
    }

    /// Human-facing label shown in the user administration screens.
    pub fn label(self) -> &'static str {
        match self {
            Role::Administrador => "Administrador",
            Role::Presidente => "Presidente",
            Role::Vicepresidente => "Vicepresidente",
            Role::SecretarioCam => "Secretario CAM",
            Role::SecretarioAmpp => "Secretario AMPP",
            Role::SecretarioCf => "Secretario Comisiones CF",
            Role::Intendente => "Intendente",
            Role::CfMember => "Miembro Comisiones CF",
        }
    }

    /// Presidente and vicepresidente bypass the permission table entirely.
    pub fn is_executive(self) -> bool {
        matches!(self, Role::Presidente | Role::Vicepresidente)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role identifier is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("unknown role: '{value}'")]
pub struct UnknownRole {
    pub value: String,
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownRole {
                value: s.to_string(),
            })
    }
}

/// A `(value, label)` pair for select inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Role choices for the user administration forms.
pub fn role_options() -> Vec<SelectOption> {
    Role::ALL
        .iter()
        .map(|role| SelectOption {
            value: role.as_str(),
            label: role.label(),
        })
        .collect()
}

//! Workspaces scoping document visibility and access rights.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use derive_more::{Display, Error};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::http::security::role::SelectOption;

/// A named organizational unit owning a set of documents.
///
/// # Example
/// ```
/// use lisadocs_core::http::security::Workspace;
///
/// assert_eq!(Workspace::from_segment("comisiones"), Some(Workspace::ComisionesCf));
/// assert_eq!(Workspace::from_segment("unknown_ws"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workspace {
    Presidencia,
    Intendencia,
    Cam,
    Ampp,
    ComisionesCf,
}

impl Workspace {
    /// All workspaces in enumeration order.
    pub const ALL: [Workspace; 5] = [
        Workspace::Presidencia,
        Workspace::Intendencia,
        Workspace::Cam,
        Workspace::Ampp,
        Workspace::ComisionesCf,
    ];

    /// Backend identifier of the workspace.
    pub fn as_str(self) -> &'static str {
        match self {
            Workspace::Presidencia => "presidencia",
            Workspace::Intendencia => "intendencia",
            Workspace::Cam => "cam",
            Workspace::Ampp => "ampp",
            Workspace::ComisionesCf => "comisiones_cf",
        }
    }

    /// Human-facing workspace name.
    pub fn label(self) -> &'static str {
        match self {
            Workspace::Presidencia => "Presidencia",
            Workspace::Intendencia => "Intendencia",
            Workspace::Cam => "CAM",
            Workspace::Ampp => "AMPP",
            Workspace::ComisionesCf => "Comisiones CF",
        }
    }

    /// Maps a navigation segment to a workspace.
    ///
    /// Lowercases the input, folds runs of `-`, `_`, `.` and whitespace into
    /// a single `_`, then accepts the canonical identifiers and the short
    /// aliases used in URLs (`comisiones`, `cf`). Returns `None` for anything
    /// else.
    pub fn from_segment(segment: &str) -> Option<Workspace> {
        let normalized = separators()
            .replace_all(&segment.trim().to_lowercase(), "_")
            .trim_matches('_')
            .to_string();

        match normalized.as_str() {
            "comisiones" | "cf" => Some(Workspace::ComisionesCf),
            other => Workspace::ALL.iter().copied().find(|w| w.as_str() == other),
        }
    }
}

fn separators() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new(r"[\s_.\-]+").expect("separator pattern is valid"))
}

impl fmt::Display for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a workspace identifier is not one of the known workspaces.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("unknown workspace: '{value}'")]
pub struct UnknownWorkspace {
    pub value: String,
}

impl FromStr for Workspace {
    type Err = UnknownWorkspace;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Workspace::ALL
            .iter()
            .copied()
            .find(|w| w.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownWorkspace {
                value: s.to_string(),
            })
    }
}

/// Workspace choices for the user administration forms.
pub fn workspace_options() -> Vec<SelectOption> {
    Workspace::ALL
        .iter()
        .map(|w| SelectOption {
            value: w.as_str(),
            label: w.label(),
        })
        .collect()
}

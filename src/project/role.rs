//! Project roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role granted to every user of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    #[serde(rename = "project-owner")]
    Owner,
    #[serde(rename = "project-editor")]
    Editor,
    #[serde(rename = "project-viewer")]
    Viewer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Owner, Role::Editor, Role::Viewer];

    /// Value sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "project-owner",
            Role::Editor => "project-editor",
            Role::Viewer => "project-viewer",
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Owner => "Owner",
            Role::Editor => "Editor",
            Role::Viewer => "Viewer",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::Owner => "Full access to project resources",
            Role::Editor => "Can modify project resources",
            Role::Viewer => "Read-only access to project",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}' (expected owner, editor or viewer)")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    /// Accepts the wire value or the label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| {
                needle.eq_ignore_ascii_case(role.as_str()) || needle.eq_ignore_ascii_case(role.label())
            })
            .ok_or_else(|| ParseRoleError(needle.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Editor).unwrap(), r#""project-editor""#);
        let role: Role = serde_json::from_str(r#""project-viewer""#).unwrap();
        assert_eq!(role, Role::Viewer);
    }

    #[test]
    fn test_parse_value_or_label() {
        assert_eq!("project-owner".parse::<Role>().unwrap(), Role::Owner);
        assert_eq!("editor".parse::<Role>().unwrap(), Role::Editor);
        assert_eq!(" Viewer ".parse::<Role>().unwrap(), Role::Viewer);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_default_is_owner() {
        assert_eq!(Role::default(), Role::Owner);
        assert_eq!(Role::Owner.description(), "Full access to project resources");
    }
}

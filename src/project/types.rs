//! Wire types for the project API.

use serde::{Deserialize, Serialize};

use crate::project::role::Role;
use crate::security::sanitize::trim_input;

/// One group of users sharing a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGroup {
    /// Comma-delimited user identifiers (emails or usernames).
    #[serde(rename = "userIds")]
    pub user_ids: String,
    pub role: Role,
}

impl UserGroup {
    pub fn new(user_ids: impl Into<String>, role: Role) -> Self {
        Self {
            user_ids: user_ids.into(),
            role,
        }
    }

    /// Identifiers after splitting on `,` and trimming; empties dropped.
    pub fn identifiers(&self) -> Vec<&str> {
        split_identifiers(&self.user_ids)
    }
}

/// Split a comma-delimited identifier list.
pub fn split_identifiers(user_ids: &str) -> Vec<&str> {
    user_ids
        .split(',')
        .map(trim_input)
        .filter(|id| !id.is_empty())
        .collect()
}

/// Body of `POST /api/create-project`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSubmission {
    /// Project name (`^[a-z0-9-]{3,63}$`).
    #[serde(rename = "appID")]
    pub name: String,
    pub description: String,
    #[serde(rename = "userGroups")]
    pub user_groups: Vec<UserGroup>,
}

impl ProjectSubmission {
    pub fn total_users(&self) -> usize {
        self.user_groups.iter().map(|g| g.identifiers().len()).sum()
    }
}

/// Response of `POST /api/create-project`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProjectResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
}

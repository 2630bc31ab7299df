//! Client-side validation.
//!
//! Rules run in a fixed order and stop at the first failure:
//! name required, name charset, name length, at least one user,
//! user cap, then per group (ids present, role selected, each id valid).
//! A passing form yields the sanitized [`ProjectSubmission`].

use thiserror::Error;

use crate::form::state::FormState;
use crate::project::{ProjectSubmission, UserGroup};
use crate::security::sanitize::{
    sanitize_description, sanitize_project_name, sanitize_user_id, trim_input,
    PROJECT_NAME_MAX_LEN, PROJECT_NAME_MIN_LEN,
};

/// A user-correctable problem with one field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Project name is required.")]
    ProjectNameRequired,

    #[error("Project name can only contain lowercase letters, numbers, and hyphens.")]
    ProjectNameCharset,

    #[error("Project name must be at least 3 characters long.")]
    ProjectNameTooShort,

    #[error("Project name must be at most 63 characters long.")]
    ProjectNameTooLong,

    #[error("At least one user must be specified.")]
    NoUsers,

    #[error("Maximum {max} users allowed per project.")]
    TooManyUsers { max: usize },

    #[error("User IDs cannot be empty.")]
    EmptyUserIds,

    #[error("Role must be selected for each group.")]
    RoleNotSelected,

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Invalid user ID: {0}")]
    InvalidUserId(String),
}

fn validate_project_name(raw: &str) -> Result<String, ValidationError> {
    let normalized = trim_input(raw).to_lowercase();
    if normalized.is_empty() {
        return Err(ValidationError::ProjectNameRequired);
    }
    if !normalized
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ValidationError::ProjectNameCharset);
    }
    let len = normalized.chars().count();
    if len < PROJECT_NAME_MIN_LEN {
        return Err(ValidationError::ProjectNameTooShort);
    }
    if len > PROJECT_NAME_MAX_LEN {
        return Err(ValidationError::ProjectNameTooLong);
    }
    sanitize_project_name(&normalized).ok_or(ValidationError::ProjectNameCharset)
}

/// Validate the form and build the sanitized submission.
pub fn validate(state: &FormState, max_users: usize) -> Result<ProjectSubmission, ValidationError> {
    let name = validate_project_name(&state.project_name)?;

    let total = state.total_users();
    if total == 0 {
        return Err(ValidationError::NoUsers);
    }
    if total > max_users {
        return Err(ValidationError::TooManyUsers { max: max_users });
    }

    let mut user_groups = Vec::with_capacity(state.groups.len());
    for group in &state.groups {
        let ids = group.identifiers();
        if ids.is_empty() {
            return Err(ValidationError::EmptyUserIds);
        }
        let role = group.role.ok_or(ValidationError::RoleNotSelected)?;

        let mut sanitized = Vec::with_capacity(ids.len());
        for id in ids {
            match sanitize_user_id(id) {
                Some(value) => sanitized.push(value),
                None if id.contains('@') => {
                    return Err(ValidationError::InvalidEmail(id.to_string()))
                }
                None => return Err(ValidationError::InvalidUserId(id.to_string())),
            }
        }
        user_groups.push(UserGroup::new(sanitized.join(", "), role));
    }

    Ok(ProjectSubmission {
        name,
        description: sanitize_description(&state.description),
        user_groups,
    })
}

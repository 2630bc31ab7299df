//! Form state and the submission status machine.
//!
//! ```text
//! Idle ──review ok──▶ Idle ──submit──▶ Loading ──▶ Success ──reset──▶ Idle
//!   │                                     │
//!   └──review failed──▶ Error ◀───────────┘
//!                        │ └──submit──▶ Loading
//!                        └──review ok──▶ Idle
//! ```

use std::fmt;

use thiserror::Error;

use crate::project::{split_identifiers, Role};

/// Status of the single in-flight submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Idle => "idle",
            SubmissionStatus::Loading => "loading",
            SubmissionStatus::Success => "success",
            SubmissionStatus::Error => "error",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal status transition: {from} -> {to}")]
pub struct IllegalTransition {
    pub from: SubmissionStatus,
    pub to: SubmissionStatus,
}

pub fn allowed_transitions(from: SubmissionStatus) -> &'static [SubmissionStatus] {
    use SubmissionStatus::*;
    match from {
        Idle => &[Idle, Loading, Error],
        Loading => &[Success, Error],
        Success => &[Idle, Error],
        Error => &[Idle, Loading, Error],
    }
}

pub fn validate_transition(
    from: SubmissionStatus,
    to: SubmissionStatus,
) -> Result<(), IllegalTransition> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(IllegalTransition { from, to })
    }
}

/// One editable user group row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInput {
    /// Raw comma-separated identifiers as typed.
    pub user_ids: String,
    /// `None` until a role is picked.
    pub role: Option<Role>,
}

impl Default for GroupInput {
    fn default() -> Self {
        Self {
            user_ids: String::new(),
            role: Some(Role::default()),
        }
    }
}

impl GroupInput {
    pub fn new(user_ids: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            user_ids: user_ids.into(),
            role,
        }
    }

    pub fn identifiers(&self) -> Vec<&str> {
        split_identifiers(&self.user_ids)
    }
}

/// All transient form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub project_name: String,
    pub description: String,
    pub groups: Vec<GroupInput>,
    status: SubmissionStatus,
    message: Option<String>,
    show_summary: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            description: String::new(),
            groups: vec![GroupInput::default()],
            status: SubmissionStatus::Idle,
            message: None,
            show_summary: false,
        }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn show_summary(&self) -> bool {
        self.show_summary
    }

    pub fn is_loading(&self) -> bool {
        self.status == SubmissionStatus::Loading
    }

    /// Identifiers across all groups.
    pub fn total_users(&self) -> usize {
        self.groups.iter().map(|g| g.identifiers().len()).sum()
    }

    fn transition(
        &mut self,
        to: SubmissionStatus,
        message: Option<String>,
    ) -> Result<(), IllegalTransition> {
        validate_transition(self.status, to)?;
        tracing::trace!(from = %self.status, to = %to, "Form status transition");
        self.status = to;
        self.message = message;
        Ok(())
    }

    /// Validation failed: show the message, keep the fields.
    pub fn reject(&mut self, message: impl Into<String>) -> Result<(), IllegalTransition> {
        self.transition(SubmissionStatus::Error, Some(message.into()))
    }

    /// Validation passed: open the summary and clear any message.
    pub fn open_summary(&mut self) -> Result<(), IllegalTransition> {
        self.transition(SubmissionStatus::Idle, None)?;
        self.show_summary = true;
        Ok(())
    }

    pub fn close_summary(&mut self) {
        self.show_summary = false;
    }

    pub fn begin_submit(&mut self) -> Result<(), IllegalTransition> {
        self.transition(SubmissionStatus::Loading, None)
    }

    pub fn succeed(&mut self, message: impl Into<String>) -> Result<(), IllegalTransition> {
        self.transition(SubmissionStatus::Success, Some(message.into()))
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), IllegalTransition> {
        self.transition(SubmissionStatus::Error, Some(message.into()))
    }

    /// Back to empty defaults after a success.
    pub fn reset(&mut self) -> Result<(), IllegalTransition> {
        validate_transition(self.status, SubmissionStatus::Idle)?;
        *self = Self::default();
        Ok(())
    }
}

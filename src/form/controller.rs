//! Form controller.
//!
//! # Responsibilities
//! - Own the [`FormState`] and apply edits to it
//! - Validate before any network call and open the confirmation summary
//! - Submit the reviewed project through the [`ApiClient`]
//! - Reset the form a fixed delay after a successful submission
//!
//! # Design Decisions
//! - At most one request in flight: `submit` is refused while loading
//! - API failures never surface raw detail; the user sees a generic message
//! - The reset deadline uses `tokio::time::Instant` so it follows a paused clock

use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::config::PortalConfig;
use crate::form::state::{FormState, GroupInput, IllegalTransition, SubmissionStatus};
use crate::form::summary::ProjectSummary;
use crate::form::validation::{validate, ValidationError};
use crate::http::ApiClient;
use crate::observability::metrics;
use crate::project::{ProjectSubmission, Role};

/// Shown when the server reports failure without a message.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

/// Errors from form operations. API failures are not among them: they end
/// in the `error` status with a user-facing message.
#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("a submission is already in progress")]
    Busy,

    #[error("the project must be reviewed before it is submitted")]
    NotReviewed,

    #[error(transparent)]
    Transition(#[from] IllegalTransition),
}

/// Drives one project form.
#[derive(Debug)]
pub struct FormController {
    client: ApiClient,
    endpoint: String,
    max_users: usize,
    reset_delay: Duration,
    state: FormState,
    reviewed: Option<ProjectSubmission>,
    reset_at: Option<Instant>,
}

impl FormController {
    pub fn new(client: ApiClient, config: &PortalConfig) -> Self {
        Self {
            client,
            endpoint: config.create_project_endpoint(),
            max_users: config.form.max_users_per_project,
            reset_delay: Duration::from_millis(config.form.success_reset_ms),
            state: FormState::new(),
            reviewed: None,
            reset_at: None,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn max_users(&self) -> usize {
        self.max_users
    }

    pub fn total_users(&self) -> usize {
        self.state.total_users()
    }

    // Any edit invalidates a previous review.
    fn edit(&mut self) -> Option<&mut FormState> {
        if self.state.is_loading() {
            return None;
        }
        self.reviewed = None;
        self.state.close_summary();
        Some(&mut self.state)
    }

    pub fn set_project_name(&mut self, name: impl Into<String>) -> bool {
        match self.edit() {
            Some(state) => {
                state.project_name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> bool {
        match self.edit() {
            Some(state) => {
                state.description = description.into();
                true
            }
            None => false,
        }
    }

    /// Replace the identifiers of group `index`.
    pub fn set_user_ids(&mut self, index: usize, user_ids: impl Into<String>) -> bool {
        if index >= self.state.groups.len() {
            return false;
        }
        match self.edit() {
            Some(state) => {
                state.groups[index].user_ids = user_ids.into();
                true
            }
            None => false,
        }
    }

    pub fn set_role(&mut self, index: usize, role: Option<Role>) -> bool {
        if index >= self.state.groups.len() {
            return false;
        }
        match self.edit() {
            Some(state) => {
                state.groups[index].role = role;
                true
            }
            None => false,
        }
    }

    /// Whether another group may be added.
    pub fn can_add_group(&self) -> bool {
        !self.state.is_loading() && self.total_users() < self.max_users
    }

    /// Append an empty group with the default role.
    pub fn add_group(&mut self) -> bool {
        if !self.can_add_group() {
            return false;
        }
        match self.edit() {
            Some(state) => {
                state.groups.push(GroupInput::default());
                true
            }
            None => false,
        }
    }

    /// Remove group `index`; the last group can never be removed.
    pub fn remove_group(&mut self, index: usize) -> bool {
        if self.state.groups.len() <= 1 || index >= self.state.groups.len() {
            return false;
        }
        match self.edit() {
            Some(state) => {
                state.groups.remove(index);
                true
            }
            None => false,
        }
    }

    /// Validate and open the confirmation summary.
    pub fn review(&mut self) -> Result<ProjectSummary, FormError> {
        if self.state.is_loading() {
            return Err(FormError::Busy);
        }

        match validate(&self.state, self.max_users) {
            Ok(submission) => {
                self.state.open_summary()?;
                let summary = ProjectSummary::from(&submission);
                self.reviewed = Some(submission);
                Ok(summary)
            }
            Err(e) => {
                metrics::record_validation_failure();
                tracing::debug!(error = %e, "Form validation failed");
                self.reviewed = None;
                self.state.close_summary();
                self.state.reject(e.to_string())?;
                Err(e.into())
            }
        }
    }

    /// Close the summary without submitting.
    pub fn cancel_review(&mut self) -> bool {
        if self.state.is_loading() {
            return false;
        }
        self.state.close_summary();
        true
    }

    /// Submit the reviewed project. Returns the resulting status.
    pub async fn submit(&mut self) -> Result<SubmissionStatus, FormError> {
        if self.state.is_loading() {
            return Err(FormError::Busy);
        }
        let submission = match (&self.reviewed, self.state.show_summary()) {
            (Some(submission), true) => submission.clone(),
            _ => return Err(FormError::NotReviewed),
        };

        self.state.begin_submit()?;
        tracing::info!(project = %submission.name, users = submission.total_users(), "Submitting project");

        let result = self.client.create_project(&self.endpoint, &submission).await;
        match result {
            Ok(response) if response.success => {
                tracing::info!(project = %submission.name, "Project created");
                self.state.succeed(response.message)?;
                self.reset_at = Some(Instant::now() + self.reset_delay);
            }
            Ok(response) => {
                tracing::warn!(project = %submission.name, message = %response.message, "Project creation rejected");
                let message = if response.message.is_empty() {
                    UNKNOWN_ERROR_MESSAGE.to_string()
                } else {
                    response.message
                };
                self.state.fail(message)?;
            }
            Err(e) => {
                self.state.fail(e.user_message())?;
            }
        }

        Ok(self.state.status())
    }

    /// When the success reset is due, if one is pending.
    pub fn reset_deadline(&self) -> Option<Instant> {
        self.reset_at
    }

    /// Apply the success reset if its deadline has passed.
    pub fn tick(&mut self) -> Result<bool, FormError> {
        match self.reset_at {
            Some(deadline) if Instant::now() >= deadline => {
                self.reset()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Wait for the pending success reset and apply it.
    pub async fn await_reset(&mut self) -> Result<bool, FormError> {
        match self.reset_at {
            Some(deadline) => {
                tokio::time::sleep_until(deadline).await;
                self.reset()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn reset(&mut self) -> Result<(), FormError> {
        self.state.reset()?;
        self.reviewed = None;
        self.reset_at = None;
        tracing::debug!("Form reset");
        Ok(())
    }
}

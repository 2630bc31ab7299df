//! Project form logic.
//!
//! # Data Flow
//! ```text
//! edits (name, description, groups)
//!     → review(): validation.rs → sanitized ProjectSubmission → summary.rs
//!     → submit(): ApiClient::create_project → {success, message}
//!     → status: idle → loading → success | error
//!     → success: reset to empty defaults after the configured delay
//! ```

pub mod controller;
pub mod state;
pub mod summary;
pub mod validation;

pub use controller::{FormController, FormError, UNKNOWN_ERROR_MESSAGE};
pub use state::{FormState, GroupInput, SubmissionStatus};
pub use summary::ProjectSummary;
pub use validation::{validate, ValidationError};

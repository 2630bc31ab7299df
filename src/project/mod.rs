//! Project domain types shared by the form and the API client.

pub mod role;
pub mod types;

pub use role::{ParseRoleError, Role};
pub use types::{
    split_identifiers, CreateProjectResponse, HealthResponse, ProjectSubmission, UserGroup,
};

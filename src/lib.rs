//! Project self-service portal.
//!
//! Collects a project name, description and role-assigned user groups,
//! validates and sanitizes them locally, then submits the project as one
//! SigV4-signed HTTPS request.

pub mod config;
pub mod form;
pub mod http;
pub mod observability;
pub mod project;
pub mod security;
pub mod signing;

pub use config::schema::PortalConfig;
pub use form::{FormController, SubmissionStatus};
pub use http::{ApiClient, ApiError};
pub use signing::{RequestSigner, SigV4Signer};

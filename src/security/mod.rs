//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Form input:
//!     → sanitize.rs (per-field normalization, None on invalid)
//!     → form validation (user-facing messages)
//!
//! Outbound request:
//!     → headers.rs (mandatory anti-CSRF / content-type headers)
//!     → csrf.rs (configured token length check)
//!
//! Inbound response:
//!     → headers.rs (advisory nosniff check, warn only)
//! ```
//!
//! # Design Decisions
//! - Sanitizers are pure and never fail loudly: invalid input is `None`
//! - HTML escaping is context-specific (text node vs attribute value)
//! - Response header checks are advisory; they log, they do not reject

pub mod csrf;
pub mod headers;
pub mod sanitize;

pub use csrf::validate_csrf_token;
pub use sanitize::{
    sanitize_description, sanitize_email, sanitize_html, sanitize_html_attribute,
    sanitize_project_name, sanitize_user_id, trim_input, MAX_DESCRIPTION_CHARS,
};

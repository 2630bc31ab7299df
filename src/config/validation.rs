//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Enforce the https-only policy on the API and identity endpoints before any client is built
//! - Validate value ranges (limits > 0, region format, token length)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PortalConfig → Result<(), Vec<ConfigValidationError>>
//! - Runs before config is accepted into the system

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use url::Url;

use crate::config::schema::PortalConfig;
use crate::security::validate_csrf_token;

static REGION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2}-[a-z]+-\d+$").expect("region pattern"));

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("api.endpoint is not a valid URL: {0}")]
    InvalidEndpoint(String),

    #[error("api.endpoint must use https: {0}")]
    InsecureEndpoint(String),

    #[error("api.csrf_token must be 32 to 128 characters long")]
    InvalidCsrfToken,

    #[error("identity.endpoint is not a valid URL: {0}")]
    InvalidIdentityEndpoint(String),

    #[error("identity.endpoint must use https: {0}")]
    InsecureIdentityEndpoint(String),

    #[error("identity.pool_id must not be empty")]
    MissingPoolId,

    #[error("identity.region has an invalid format: {0}")]
    InvalidRegion(String),

    #[error("signing.service must not be empty")]
    MissingService,

    #[error("timeouts.request_ms must be greater than zero")]
    ZeroTimeout,

    #[error("form.max_users_per_project must be greater than zero")]
    ZeroMaxUsers,
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &PortalConfig) -> Result<(), Vec<ConfigValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.api.endpoint) {
        Ok(url) if url.scheme() != "https" => {
            errors.push(ConfigValidationError::InsecureEndpoint(config.api.endpoint.clone()));
        }
        Ok(_) => {}
        Err(e) => errors.push(ConfigValidationError::InvalidEndpoint(format!(
            "{} ({})",
            config.api.endpoint, e
        ))),
    }

    if let Some(token) = &config.api.csrf_token {
        if !validate_csrf_token(token) {
            errors.push(ConfigValidationError::InvalidCsrfToken);
        }
    }

    if config.identity.pool_id.trim().is_empty() {
        errors.push(ConfigValidationError::MissingPoolId);
    }

    if let Some(endpoint) = &config.identity.endpoint {
        match Url::parse(endpoint) {
            Ok(url) if url.scheme() != "https" => {
                errors.push(ConfigValidationError::InsecureIdentityEndpoint(endpoint.clone()));
            }
            Ok(_) => {}
            Err(e) => errors.push(ConfigValidationError::InvalidIdentityEndpoint(format!(
                "{} ({})",
                endpoint, e
            ))),
        }
    }

    if !REGION_RE.is_match(&config.identity.region) {
        errors.push(ConfigValidationError::InvalidRegion(config.identity.region.clone()));
    }

    if config.signing.service.trim().is_empty() {
        errors.push(ConfigValidationError::MissingService);
    }

    if config.timeouts.request_ms == 0 {
        errors.push(ConfigValidationError::ZeroTimeout);
    }

    if config.form.max_users_per_project == 0 {
        errors.push(ConfigValidationError::ZeroMaxUsers);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::PortalConfig;
use crate::config::validation::{validate_config, ConfigValidationError};

pub const ENV_API_ENDPOINT: &str = "PORTAL_API_ENDPOINT";
pub const ENV_CSRF_TOKEN: &str = "PORTAL_CSRF_TOKEN";
pub const ENV_IDENTITY_POOL_ID: &str = "PORTAL_IDENTITY_POOL_ID";
pub const ENV_AWS_REGION: &str = "PORTAL_AWS_REGION";
pub const ENV_HELP_URL: &str = "PORTAL_HELP_URL";
pub const ENV_MAX_USERS_PER_PROJECT: &str = "PORTAL_MAX_USERS_PER_PROJECT";
pub const ENV_VERSION: &str = "PORTAL_VERSION";
pub const ENV_ENVIRONMENT: &str = "PORTAL_ENVIRONMENT";
pub const ENV_DEBUG_MODE: &str = "PORTAL_DEBUG_MODE";
pub const ENV_ANALYTICS: &str = "PORTAL_ANALYTICS";
pub const ENV_LOG_LEVEL: &str = "PORTAL_LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ConfigValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load a TOML file, apply environment overrides, and validate.
pub fn load_config(path: &Path) -> Result<PortalConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: PortalConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(path = %path.display(), "Configuration loaded from file");
    Ok(config)
}

/// Build a configuration from defaults plus environment overrides.
pub fn load_from_env() -> Result<PortalConfig, ConfigError> {
    let mut config = PortalConfig::default();
    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply `PORTAL_*` overrides from the process environment.
pub fn apply_env_overrides(config: &mut PortalConfig) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

/// Apply overrides from an arbitrary lookup.
///
/// Empty values are ignored. Booleans are true only for the exact string
/// `true`; numbers that fail to parse keep the current value.
pub fn apply_overrides<F>(config: &mut PortalConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(v) = get(ENV_API_ENDPOINT) {
        config.api.endpoint = v;
    }
    if let Some(v) = get(ENV_CSRF_TOKEN) {
        config.api.csrf_token = Some(v);
    }
    if let Some(v) = get(ENV_IDENTITY_POOL_ID) {
        config.identity.pool_id = v;
    }
    if let Some(v) = get(ENV_AWS_REGION) {
        config.identity.region = v;
    }
    if let Some(v) = get(ENV_HELP_URL) {
        config.app.help_url = v;
    }
    if let Some(v) = get(ENV_MAX_USERS_PER_PROJECT) {
        match v.trim().parse() {
            Ok(max) => config.form.max_users_per_project = max,
            Err(_) => tracing::warn!(
                value = %v,
                "Ignoring unparseable {}", ENV_MAX_USERS_PER_PROJECT
            ),
        }
    }
    if let Some(v) = get(ENV_VERSION) {
        config.app.version = v;
    }
    if let Some(v) = get(ENV_ENVIRONMENT) {
        config.app.environment = v;
    }
    if let Some(v) = get(ENV_DEBUG_MODE) {
        config.features.debug_mode = v == "true";
    }
    if let Some(v) = get(ENV_ANALYTICS) {
        config.features.analytics = v == "true";
    }
    if let Some(v) = get(ENV_LOG_LEVEL) {
        config.observability.log_level = v;
    }
}

//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, PORTAL_* env overrides)
//!     → validation.rs (semantic checks)
//!     → PortalConfig (validated, immutable)
//!     → injected into the API client and form controller at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no global instance
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{
    ApiConfig, AppConfig, CredentialSource, FeatureFlags, FormConfig, IdentityConfig,
    ObservabilityConfig, PortalConfig, SigningConfig, TimeoutConfig,
};
pub use validation::{validate_config, ConfigValidationError};

//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the portal.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the portal.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct PortalConfig {
    /// Remote API settings.
    pub api: ApiConfig,

    /// Identity pool used to obtain signing credentials.
    pub identity: IdentityConfig,

    /// Request signing settings.
    pub signing: SigningConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Form behaviour.
    pub form: FormConfig,

    /// Application metadata shown by the front end.
    pub app: AppConfig,

    /// Feature flags.
    pub features: FeatureFlags,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl PortalConfig {
    /// Endpoint receiving project creation requests.
    pub fn create_project_endpoint(&self) -> String {
        format!("{}/api/create-project", self.api.base())
    }

    /// Health check endpoint.
    pub fn health_endpoint(&self) -> String {
        format!("{}/health", self.api.base())
    }
}

/// Remote API configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the API (must be https).
    pub endpoint: String,

    /// Optional anti-CSRF token sent as `X-CSRF-Token`.
    pub csrf_token: Option<String>,
}

impl ApiConfig {
    fn base(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://your-api-gateway-url.execute-api.us-east-1.amazonaws.com/prod"
                .to_string(),
            csrf_token: None,
        }
    }
}

/// Where signing credentials come from.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    /// Unauthenticated identity pool exchange.
    Cognito,
    /// `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN`.
    Static,
}

/// Identity pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct IdentityConfig {
    /// Identity pool identifier (`region:uuid`).
    pub pool_id: String,

    /// AWS region of the pool and the API.
    pub region: String,

    /// Credential source.
    pub source: CredentialSource,

    /// Override for the identity service endpoint (testing, private links).
    pub endpoint: Option<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            pool_id: "us-east-1:00000000-0000-0000-0000-000000000000".to_string(),
            region: "us-east-1".to_string(),
            source: CredentialSource::Cognito,
            endpoint: None,
        }
    }
}

/// Request signing configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SigningConfig {
    /// Service name in the credential scope.
    pub service: String,

    /// Sign an `x-amz-content-sha256` header.
    pub include_content_hash: bool,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            service: "execute-api".to_string(),
            include_content_hash: true,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Hard deadline for one API exchange, measured from dispatch.
    pub request_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_ms: 30_000 }
    }
}

/// Form behaviour.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FormConfig {
    /// Maximum users across all groups of one project.
    pub max_users_per_project: usize,

    /// Delay before a successful submission resets the form.
    pub success_reset_ms: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            max_users_per_project: 8,
            success_reset_ms: 3_000,
        }
    }
}

/// Application metadata.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Documentation link shown to users.
    pub help_url: String,

    /// Application version.
    pub version: String,

    /// Deployment environment (development, staging, production).
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            help_url: "https://docs.nobl9.com".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Feature flags.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FeatureFlags {
    /// Print version/environment/endpoint and log at debug level.
    pub debug_mode: bool,

    /// Analytics opt-in (reported in debug output only).
    pub analytics: bool,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

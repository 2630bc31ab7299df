//! Credentials and credential providers.
//!
//! # Security
//! - Secrets are loaded from a provider or the standard AWS environment variables
//! - Secret keys and session tokens are never logged or serialized

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::signing::types::{SigningError, SigningResult};

pub const ACCESS_KEY_ENV_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_KEY_ENV_VAR: &str = "AWS_SECRET_ACCESS_KEY";
pub const SESSION_TOKEN_ENV_VAR: &str = "AWS_SESSION_TOKEN";

/// Short-lived access credentials.
#[derive(Clone)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
    expiration: Option<DateTime<Utc>>,
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
        expiration: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
            expiration,
        }
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.expiration
    }

    /// True if the credentials stay valid for at least `margin` past `now`.
    /// Credentials without an expiration never go stale.
    pub fn is_fresh_at(&self, now: DateTime<Utc>, margin: chrono::Duration) -> bool {
        match self.expiration {
            Some(expiration) => expiration - now > margin,
            None => true,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Source of signing credentials.
///
/// Implementations own any caching and refresh policy.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    async fn credentials(&self) -> SigningResult<Credentials>;
}

/// Provider returning a fixed set of credentials.
#[derive(Debug, Clone)]
pub struct StaticCredentialsProvider {
    credentials: Credentials,
}

impl StaticCredentialsProvider {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Read credentials from the standard AWS environment variables.
    pub fn from_env() -> SigningResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable lookup.
    pub fn from_lookup<F>(lookup: F) -> SigningResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_key = lookup(ACCESS_KEY_ENV_VAR)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| SigningError::Credentials(format!("{} is not set", ACCESS_KEY_ENV_VAR)))?;
        let secret_key = lookup(SECRET_KEY_ENV_VAR)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| SigningError::Credentials(format!("{} is not set", SECRET_KEY_ENV_VAR)))?;
        let session_token = lookup(SESSION_TOKEN_ENV_VAR).filter(|v| !v.is_empty());

        tracing::info!(access_key_id = %access_key, "Loaded static credentials from environment");

        Ok(Self::new(Credentials::new(access_key, secret_key, session_token, None)))
    }
}

#[async_trait]
impl CredentialsProvider for StaticCredentialsProvider {
    async fn credentials(&self) -> SigningResult<Credentials> {
        Ok(self.credentials.clone())
    }
}

//! Identity-pool credentials (unauthenticated Cognito flow).
//!
//! # Responsibilities
//! - Resolve an identity id for the configured pool (`GetId`)
//! - Exchange it for temporary credentials (`GetCredentialsForIdentity`)
//! - Cache both and refresh credentials shortly before they expire
//!
//! # Design Decisions
//! - Refresh is serialized behind one async mutex; concurrent callers share the result
//! - A failed exchange drops the cached identity id so the next call starts over

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::observability::metrics;
use crate::signing::credentials::{Credentials, CredentialsProvider};
use crate::signing::types::{SigningError, SigningResult};

const GET_ID_TARGET: &str = "AWSCognitoIdentityService.GetId";
const GET_CREDENTIALS_TARGET: &str = "AWSCognitoIdentityService.GetCredentialsForIdentity";
const AMZ_JSON: &str = "application/x-amz-json-1.1";

/// Refresh credentials this long before they expire.
pub const DEFAULT_REFRESH_MARGIN_SECS: i64 = 300;

/// Per-call timeout for identity service requests.
pub const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetIdResponse {
    identity_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetCredentialsResponse {
    credentials: IdentityCredentials,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct IdentityCredentials {
    access_key_id: String,
    secret_key: String,
    session_token: String,
    /// Seconds since the epoch.
    expiration: f64,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceError {
    #[serde(rename = "__type", default)]
    kind: Option<String>,
    #[serde(alias = "Message", default)]
    message: Option<String>,
}

#[derive(Default)]
struct IdentityCache {
    identity_id: Option<String>,
    credentials: Option<Credentials>,
}

/// Credentials provider backed by an identity pool.
pub struct CognitoCredentialsProvider {
    http: reqwest::Client,
    endpoint: String,
    pool_id: String,
    refresh_margin: chrono::Duration,
    cache: Mutex<IdentityCache>,
}

impl CognitoCredentialsProvider {
    /// Create a provider for `pool_id` in `region`.
    pub fn new(region: &str, pool_id: &str) -> SigningResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_IDENTITY_TIMEOUT_SECS))
            .build()
            .map_err(|e| SigningError::Credentials(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: format!("https://cognito-identity.{}.amazonaws.com/", region),
            pool_id: pool_id.to_string(),
            refresh_margin: chrono::Duration::seconds(DEFAULT_REFRESH_MARGIN_SECS),
            cache: Mutex::new(IdentityCache::default()),
        })
    }

    /// Point the provider at a different identity service endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_refresh_margin(mut self, margin: chrono::Duration) -> Self {
        self.refresh_margin = margin;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call<T: DeserializeOwned>(
        &self,
        target: &str,
        payload: serde_json::Value,
    ) -> SigningResult<T> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, AMZ_JSON)
            .header("X-Amz-Target", target)
            .body(payload.to_string())
            .send()
            .await
            .map_err(|e| SigningError::Credentials(format!("{} request failed: {}", target, e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SigningError::Credentials(format!("{} response unreadable: {}", target, e)))?;

        if !status.is_success() {
            let err: ServiceError = serde_json::from_str(&text).unwrap_or_default();
            return Err(SigningError::Credentials(format!(
                "{} returned {}: {} {}",
                target,
                status,
                err.kind.unwrap_or_default(),
                err.message.unwrap_or_default()
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| SigningError::Credentials(format!("malformed {} response: {}", target, e)))
    }

    async fn fetch(&self, cache: &mut IdentityCache) -> SigningResult<Credentials> {
        let identity_id = match &cache.identity_id {
            Some(id) => id.clone(),
            None => {
                let resp: GetIdResponse = self
                    .call(GET_ID_TARGET, serde_json::json!({ "IdentityPoolId": self.pool_id }))
                    .await?;
                cache.identity_id = Some(resp.identity_id.clone());
                resp.identity_id
            }
        };

        let resp: GetCredentialsResponse = self
            .call(
                GET_CREDENTIALS_TARGET,
                serde_json::json!({ "IdentityId": identity_id }),
            )
            .await?;

        let expiration = DateTime::<Utc>::from_timestamp(resp.credentials.expiration as i64, 0);
        tracing::debug!(
            identity_id = %identity_id,
            expiration = ?expiration,
            "Refreshed identity pool credentials"
        );

        Ok(Credentials::new(
            resp.credentials.access_key_id,
            resp.credentials.secret_key,
            Some(resp.credentials.session_token),
            expiration,
        ))
    }
}

#[async_trait]
impl CredentialsProvider for CognitoCredentialsProvider {
    async fn credentials(&self) -> SigningResult<Credentials> {
        let mut cache = self.cache.lock().await;

        if let Some(creds) = &cache.credentials {
            if creds.is_fresh_at(Utc::now(), self.refresh_margin) {
                return Ok(creds.clone());
            }
        }

        match self.fetch(&mut cache).await {
            Ok(creds) => {
                metrics::record_credential_refresh(true);
                cache.credentials = Some(creds.clone());
                Ok(creds)
            }
            Err(e) => {
                metrics::record_credential_refresh(false);
                tracing::warn!(pool_id = %self.pool_id, error = %e, "Identity pool credential refresh failed");
                cache.identity_id = None;
                cache.credentials = None;
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for CognitoCredentialsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CognitoCredentialsProvider")
            .field("endpoint", &self.endpoint)
            .field("pool_id", &self.pool_id)
            .finish()
    }
}

//! Signed API client.
//!
//! # Responsibilities
//! - Enforce transport policy: HTTPS only, mandatory headers, hard deadline
//! - Sign every request through the [`RequestSigner`] seam
//! - Inspect responses for the advisory nosniff header
//! - Log failures with full detail and hand them back to the caller
//!
//! # Design Decisions
//! - The scheme check happens before any signing or network work
//! - Non-2xx responses are returned as `Ok`; interpreting them is the caller's job
//! - One fresh descriptor and signature per call; nothing is reused

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::Instrument;
use url::Url;

use crate::config::{CredentialSource, PortalConfig};
use crate::http::error::ApiError;
use crate::http::request::{resolve_request_id, X_REQUEST_ID};
use crate::http::transport::{ApiResponse, ReqwestTransport, Transport};
use crate::observability::metrics;
use crate::project::{CreateProjectResponse, HealthResponse, ProjectSubmission};
use crate::security::headers::{check_response_headers, merge_request_headers, X_CSRF_TOKEN};
use crate::security::validate_csrf_token;
use crate::signing::{
    CognitoCredentialsProvider, CredentialsProvider, RequestDescriptor, RequestSigner,
    SigV4Signer, StaticCredentialsProvider,
};

/// Default hard deadline for one exchange.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Options for a single [`ApiClient::call`].
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// HTTP method; `GET` when unset.
    pub method: Option<String>,
    /// Extra headers. They may override defaults but not the mandatory pair.
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl CallOptions {
    pub fn get() -> Self {
        Self {
            method: Some("GET".to_string()),
            ..Default::default()
        }
    }

    pub fn post(body: Vec<u8>) -> Self {
        Self {
            method: Some("POST".to_string()),
            body: Some(body),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Client performing signed HTTPS exchanges with the project API.
#[derive(Clone)]
pub struct ApiClient {
    signer: Arc<dyn RequestSigner>,
    transport: Arc<dyn Transport>,
    timeout: Duration,
    csrf_token: Option<String>,
}

impl ApiClient {
    pub fn new(signer: Arc<dyn RequestSigner>, transport: Arc<dyn Transport>) -> Self {
        Self {
            signer,
            transport,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            csrf_token: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send `token` as `X-CSRF-Token` on every call. Tokens failing the
    /// length check are dropped with a warning.
    pub fn with_csrf_token(mut self, token: Option<String>) -> Self {
        self.csrf_token = match token {
            Some(token) if validate_csrf_token(&token) => Some(token),
            Some(_) => {
                tracing::warn!("Ignoring CSRF token with invalid length");
                None
            }
            None => None,
        };
        self
    }

    /// Build the production client: credentials provider, SigV4 signer and
    /// reqwest transport, all taken from `config`.
    pub fn from_config(config: &PortalConfig) -> Result<Self, ApiError> {
        let provider: Arc<dyn CredentialsProvider> = match config.identity.source {
            CredentialSource::Cognito => {
                let mut provider =
                    CognitoCredentialsProvider::new(&config.identity.region, &config.identity.pool_id)?;
                if let Some(endpoint) = &config.identity.endpoint {
                    provider = provider.with_endpoint(endpoint.clone());
                }
                Arc::new(provider)
            }
            CredentialSource::Static => Arc::new(StaticCredentialsProvider::from_env()?),
        };

        let signer = SigV4Signer::new(
            provider,
            config.identity.region.clone(),
            config.signing.service.clone(),
        )
        .with_content_hash(config.signing.include_content_hash);

        tracing::debug!(
            region = %config.identity.region,
            service = %config.signing.service,
            source = ?config.identity.source,
            timeout_ms = config.timeouts.request_ms,
            "API client configured"
        );

        Ok(Self::new(Arc::new(signer), Arc::new(ReqwestTransport::new()?))
            .with_timeout(Duration::from_millis(config.timeouts.request_ms))
            .with_csrf_token(config.api.csrf_token.clone()))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Perform one signed exchange against `endpoint`.
    pub async fn call(&self, endpoint: &str, options: CallOptions) -> Result<ApiResponse, ApiError> {
        let method = options
            .method
            .as_deref()
            .unwrap_or("GET")
            .to_ascii_uppercase();
        let request_id = resolve_request_id(&options.headers);
        let span = tracing::info_span!(
            "api_call",
            request_id = %request_id,
            method = %method,
            endpoint = %endpoint
        );

        async {
            let result = self.execute(endpoint, &method, &request_id, options).await;
            match &result {
                Ok(response) => {
                    tracing::debug!(status = %response.status(), "API call completed");
                    metrics::record_api_request(&method, response.status().as_str());
                }
                Err(e) => {
                    tracing::error!(error = %e, kind = e.kind(), "Error making signed API request");
                    metrics::record_api_request(&method, e.kind());
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        endpoint: &str,
        method: &str,
        request_id: &str,
        options: CallOptions,
    ) -> Result<ApiResponse, ApiError> {
        // 1. Transport policy
        let url = Url::parse(endpoint).map_err(|e| ApiError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        if url.scheme() != "https" {
            return Err(ApiError::Security(endpoint.to_string()));
        }

        // 2. Descriptor
        let mut defaults = vec![(X_REQUEST_ID, request_id)];
        if let Some(token) = &self.csrf_token {
            defaults.push((X_CSRF_TOKEN, token.as_str()));
        }
        let caller = options
            .headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()));

        let mut descriptor = RequestDescriptor::from_url(method, &url);
        descriptor.headers = merge_request_headers(defaults, caller);
        descriptor.body = options.body;

        // 3. Sign
        let signed = self.signer.sign(descriptor).await?;

        // 4. Dispatch under the deadline
        let response = match tokio::time::timeout(self.timeout, self.transport.send(signed)).await {
            Ok(result) => result?,
            Err(_) => return Err(ApiError::Timeout(self.timeout.as_millis() as u64)),
        };

        // 5. Advisory header check
        check_response_headers(response.headers());

        Ok(response)
    }

    /// `POST` `data` serialized as JSON.
    pub async fn post<T>(&self, endpoint: &str, data: &T) -> Result<ApiResponse, ApiError>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(data)?;
        self.call(endpoint, CallOptions::post(body)).await
    }

    /// `GET` with no body.
    pub async fn get(&self, endpoint: &str) -> Result<ApiResponse, ApiError> {
        self.call(endpoint, CallOptions::get()).await
    }

    /// Submit a project and decode the `{success, message}` body.
    pub async fn create_project(
        &self,
        endpoint: &str,
        submission: &ProjectSubmission,
    ) -> Result<CreateProjectResponse, ApiError> {
        let response = self.post(endpoint, submission).await?;
        response.json()
    }

    /// Query the health endpoint.
    pub async fn health(&self, endpoint: &str) -> Result<HealthResponse, ApiError> {
        let response = self.get(endpoint).await?;
        response.json()
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("timeout", &self.timeout)
            .field("csrf_token", &self.csrf_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

//! Wire transport for signed requests.
//!
//! # Responsibilities
//! - Send a [`SignedRequest`] exactly as signed
//! - Read the full response (status, headers, body) into an [`ApiResponse`]
//!
//! # Design Decisions
//! - The transport never alters signed headers; `host` is derived from the URL
//! - Redirects are not followed; a 3xx is handed back as the response
//! - Deadlines are enforced by the client, not the transport

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::http::error::ApiError;
use crate::signing::SignedRequest;

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| {
            ApiError::InvalidResponse(format!("status {}: {}", self.status.as_u16(), e))
        })
    }
}

/// Sends signed requests over the network.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: SignedRequest) -> Result<ApiResponse, ApiError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wrap an existing client. It should be built with
    /// `redirect::Policy::none()` so signed bodies never leave the checked origin.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: SignedRequest) -> Result<ApiResponse, ApiError> {
        let method = Method::from_bytes(request.method().as_bytes())
            .map_err(|e| ApiError::Network(format!("invalid method {}: {}", request.method(), e)))?;

        let mut builder = self.client.request(method, request.url());
        for (name, value) in request.headers() {
            // reqwest sets Host from the URL, which is the value that was signed.
            if name == "host" {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.to_vec());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read response body: {}", e)))?;

        Ok(ApiResponse::new(status, headers, body.to_vec()))
    }
}

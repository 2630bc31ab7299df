//! Request descriptors and signing errors.

use std::collections::BTreeMap;

use thiserror::Error;
use url::Url;

/// Errors raised while acquiring credentials or signing a request.
#[derive(Debug, Error)]
pub enum SigningError {
    /// Credentials could not be obtained from the provider.
    #[error("credential acquisition failed: {0}")]
    Credentials(String),

    /// The descriptor cannot be signed (malformed host, path, ...).
    #[error("request cannot be signed: {0}")]
    InvalidRequest(String),

    /// The HMAC primitive rejected its input.
    #[error("signing primitive failed: {0}")]
    Crypto(String),
}

/// Result type for signing operations.
pub type SigningResult<T> = Result<T, SigningError>;

/// An outbound HTTP request before signing.
///
/// Header names are kept lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: String,
    pub protocol: String,
    pub host: String,
    pub port: Option<u16>,
    pub path: String,
    /// Raw (already percent-encoded) query string, without the leading `?`.
    pub query: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl RequestDescriptor {
    /// Build a descriptor for `method` against a parsed URL.
    pub fn from_url(method: &str, url: &Url) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            protocol: url.scheme().to_string(),
            host: url.host_str().unwrap_or_default().to_string(),
            port: url.port(),
            path: url.path().to_string(),
            query: url.query().map(str::to_string),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Host plus explicit port, as sent in the `Host` header.
    pub fn authority(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }

    /// Full URL the descriptor points at.
    pub fn url(&self) -> String {
        let mut url = format!("{}://{}{}", self.protocol, self.authority(), self.path);
        if let Some(query) = &self.query {
            url.push('?');
            url.push_str(query);
        }
        url
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }
}

/// A descriptor carrying an `Authorization` header.
///
/// Only readable once constructed; a fresh one is produced for every call.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    inner: RequestDescriptor,
}

impl SignedRequest {
    /// Seal a signed descriptor. Fails if no `Authorization` header is set,
    /// so an unsigned request can never pass for a signed one.
    pub fn new(descriptor: RequestDescriptor) -> SigningResult<Self> {
        match descriptor.header("authorization") {
            Some(value) if !value.is_empty() => Ok(Self { inner: descriptor }),
            _ => Err(SigningError::InvalidRequest(
                "signed request is missing an Authorization header".to_string(),
            )),
        }
    }

    pub fn method(&self) -> &str {
        &self.inner.method
    }

    pub fn url(&self) -> String {
        self.inner.url()
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.inner.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.header(name)
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.inner.body.as_deref()
    }

    pub fn authorization(&self) -> &str {
        self.inner.header("authorization").unwrap_or_default()
    }

    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url() {
        let url = Url::parse("https://api.example.com:8443/prod/health?x=1").unwrap();
        let descriptor = RequestDescriptor::from_url("get", &url);

        assert_eq!(descriptor.method, "GET");
        assert_eq!(descriptor.protocol, "https");
        assert_eq!(descriptor.host, "api.example.com");
        assert_eq!(descriptor.authority(), "api.example.com:8443");
        assert_eq!(descriptor.path, "/prod/health");
        assert_eq!(descriptor.query.as_deref(), Some("x=1"));
        assert_eq!(descriptor.url(), "https://api.example.com:8443/prod/health?x=1");
    }

    #[test]
    fn test_default_port_omitted() {
        let url = Url::parse("https://api.example.com:443/prod").unwrap();
        let descriptor = RequestDescriptor::from_url("POST", &url);
        assert_eq!(descriptor.port, None);
        assert_eq!(descriptor.authority(), "api.example.com");
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let url = Url::parse("https://api.example.com/").unwrap();
        let mut descriptor = RequestDescriptor::from_url("GET", &url);
        descriptor.set_header("X-Requested-With", "XMLHttpRequest");
        assert_eq!(descriptor.header("x-requested-with"), Some("XMLHttpRequest"));
        assert_eq!(descriptor.header("X-REQUESTED-WITH"), Some("XMLHttpRequest"));
    }

    #[test]
    fn test_signed_request_requires_authorization() {
        let url = Url::parse("https://api.example.com/").unwrap();
        let mut descriptor = RequestDescriptor::from_url("GET", &url);
        assert!(SignedRequest::new(descriptor.clone()).is_err());

        descriptor.set_header("Authorization", "AWS4-HMAC-SHA256 ...");
        let signed = SignedRequest::new(descriptor).unwrap();
        assert_eq!(signed.authorization(), "AWS4-HMAC-SHA256 ...");
    }
}

//! AWS Signature Version 4 request signing.
//!
//! # Steps
//! 1. Add `host`, `x-amz-date`, and optionally `x-amz-security-token` /
//!    `x-amz-content-sha256` to the descriptor headers.
//! 2. Build the canonical request (method, URI, query, headers, payload hash).
//! 3. Hash it into the string to sign, scoped to date/region/service.
//! 4. Derive the signing key through the HMAC chain and sign.
//! 5. Attach `Authorization` and seal the result as a [`SignedRequest`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::signing::credentials::{Credentials, CredentialsProvider};
use crate::signing::types::{RequestDescriptor, SignedRequest, SigningError, SigningResult};

pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const X_AMZ_DATE: &str = "x-amz-date";
pub const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";
pub const X_AMZ_CONTENT_SHA256: &str = "x-amz-content-sha256";

type HmacSha256 = Hmac<Sha256>;

/// Turns an unsigned descriptor into a signed one.
#[async_trait]
pub trait RequestSigner: Send + Sync {
    async fn sign(&self, request: RequestDescriptor) -> SigningResult<SignedRequest>;
}

/// Region- and service-scoped SigV4 signer.
pub struct SigV4Signer {
    credentials: Arc<dyn CredentialsProvider>,
    region: String,
    service: String,
    include_content_hash: bool,
}

impl SigV4Signer {
    pub fn new(
        credentials: Arc<dyn CredentialsProvider>,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            region: region.into(),
            service: service.into(),
            include_content_hash: true,
        }
    }

    /// Toggle the signed `x-amz-content-sha256` header.
    pub fn with_content_hash(mut self, enabled: bool) -> Self {
        self.include_content_hash = enabled;
        self
    }

    /// Sign with explicit credentials and timestamp.
    pub fn sign_at(
        &self,
        mut request: RequestDescriptor,
        credentials: &Credentials,
        now: DateTime<Utc>,
    ) -> SigningResult<SignedRequest> {
        if request.host.is_empty() {
            return Err(SigningError::InvalidRequest("request has no host".to_string()));
        }
        if !request.path.is_empty() && !request.path.starts_with('/') {
            return Err(SigningError::InvalidRequest(format!(
                "path must be absolute: {}",
                request.path
            )));
        }

        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = now.format("%Y%m%d").to_string();
        let payload_hash = hex::encode(Sha256::digest(request.body.as_deref().unwrap_or_default()));

        request.headers.remove("authorization");
        let authority = request.authority();
        request.set_header("host", authority);
        request.set_header(X_AMZ_DATE, amz_date.clone());
        if let Some(token) = credentials.session_token() {
            request.set_header(X_AMZ_SECURITY_TOKEN, token);
        }
        if self.include_content_hash {
            request.set_header(X_AMZ_CONTENT_SHA256, payload_hash.clone());
        }

        let (canonical_headers, signed_headers) = canonical_headers(&request);
        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            request.method,
            canonical_uri(&request.path),
            canonical_query(request.query.as_deref()),
            canonical_headers,
            signed_headers,
            payload_hash
        );

        let scope = format!(
            "{}/{}/{}/aws4_request",
            date_stamp, self.region, self.service
        );
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let key = signing_key(
            credentials.secret_access_key(),
            &date_stamp,
            &self.region,
            &self.service,
        )?;
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?);

        request.set_header(
            "authorization",
            format!(
                "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                ALGORITHM,
                credentials.access_key_id(),
                scope,
                signed_headers,
                signature
            ),
        );

        SignedRequest::new(request)
    }
}

#[async_trait]
impl RequestSigner for SigV4Signer {
    async fn sign(&self, request: RequestDescriptor) -> SigningResult<SignedRequest> {
        let credentials = self.credentials.credentials().await?;
        self.sign_at(request, &credentials, Utc::now())
    }
}

impl std::fmt::Debug for SigV4Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigV4Signer")
            .field("region", &self.region)
            .field("service", &self.service)
            .field("include_content_hash", &self.include_content_hash)
            .finish()
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> SigningResult<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| SigningError::Crypto(format!("invalid HMAC key: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Derive the SigV4 signing key for one day/region/service scope.
pub fn signing_key(
    secret: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
) -> SigningResult<Vec<u8>> {
    let k_date = hmac_sha256(format!("AWS4{}", secret).as_bytes(), date_stamp.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn uri_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Encode each segment of an already-encoded path once more (non-S3 rule).
fn canonical_uri(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    path.split('/').map(uri_encode).collect::<Vec<_>>().join("/")
}

fn canonical_query(query: Option<&str>) -> String {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return String::new();
    };

    let mut pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (uri_encode(&k), uri_encode(&v)))
        .collect();
    pairs.sort();

    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Returns the canonical header block (each line newline-terminated) and the
/// `;`-joined signed header list. Header keys are already lowercase and the
/// map keeps them sorted.
fn canonical_headers(request: &RequestDescriptor) -> (String, String) {
    let mut block = String::new();
    let mut names = Vec::with_capacity(request.headers.len());

    for (name, value) in &request.headers {
        let value = value.split_whitespace().collect::<Vec<_>>().join(" ");
        block.push_str(name);
        block.push(':');
        block.push_str(&value);
        block.push('\n');
        names.push(name.as_str());
    }

    (block, names.join(";"))
}

//! Request and response header policy.
//!
//! # Responsibilities
//! - Build the outbound header set (mandatory headers always present)
//! - Check responses for `X-Content-Type-Options: nosniff`
//!
//! # Design Decisions
//! - Header names are stored lowercased; lookups are case-insensitive
//! - Caller headers may replace optional defaults but never the mandatory pair
//! - A missing nosniff header is logged, the response is still returned

use std::collections::BTreeMap;

use reqwest::header::HeaderMap;

pub const CONTENT_TYPE: &str = "content-type";
pub const APPLICATION_JSON: &str = "application/json";
pub const X_REQUESTED_WITH: &str = "x-requested-with";
pub const XML_HTTP_REQUEST: &str = "XMLHttpRequest";
pub const X_CSRF_TOKEN: &str = "x-csrf-token";
pub const X_CONTENT_TYPE_OPTIONS: &str = "x-content-type-options";
pub const NOSNIFF: &str = "nosniff";

/// Headers every outbound call carries regardless of caller input.
pub fn mandatory_headers() -> [(&'static str, &'static str); 2] {
    [
        (CONTENT_TYPE, APPLICATION_JSON),
        (X_REQUESTED_WITH, XML_HTTP_REQUEST),
    ]
}

/// Merge header layers into one lowercased map.
///
/// `defaults` are applied first, then `caller` (which may override them),
/// then the mandatory headers, which always win.
pub fn merge_request_headers<'a, 'b, D, C>(defaults: D, caller: C) -> BTreeMap<String, String>
where
    D: IntoIterator<Item = (&'a str, &'a str)>,
    C: IntoIterator<Item = (&'b str, &'b str)>,
{
    let mut merged = BTreeMap::new();
    for (name, value) in defaults {
        merged.insert(name.to_ascii_lowercase(), value.to_string());
    }
    for (name, value) in caller {
        merged.insert(name.to_ascii_lowercase(), value.to_string());
    }
    for (name, value) in mandatory_headers() {
        merged.insert(name.to_string(), value.to_string());
    }
    merged
}

/// Advisory check for `X-Content-Type-Options: nosniff`.
///
/// Returns whether the header was present with the expected value; logs a
/// warning otherwise.
pub fn check_response_headers(headers: &HeaderMap) -> bool {
    let nosniff = headers
        .get(X_CONTENT_TYPE_OPTIONS)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().eq_ignore_ascii_case(NOSNIFF))
        .unwrap_or(false);

    if !nosniff {
        tracing::warn!("Missing X-Content-Type-Options header in response");
    }
    nosniff
}

//! Per-call request identity.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every outbound call
//! - Carry it in the `X-Request-Id` header and the call's tracing span
//!
//! # Design Decisions
//! - The ID is attached before signing so it is covered by the signature
//! - A caller-supplied `X-Request-Id` wins over the generated one

use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Fresh request ID for one API call.
pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// The request ID a call will carry: the caller's, if they set one.
pub fn resolve_request_id<'a, I>(caller_headers: I) -> String
where
    I: IntoIterator<Item = &'a (String, String)>,
{
    caller_headers
        .into_iter()
        .find(|(name, value)| name.eq_ignore_ascii_case(X_REQUEST_ID) && !value.is_empty())
        .map(|(_, value)| value.clone())
        .unwrap_or_else(new_request_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_uuids() {
        let a = new_request_id();
        let b = new_request_id();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn test_caller_id_wins() {
        let headers = vec![("X-Request-ID".to_string(), "trace-123".to_string())];
        assert_eq!(resolve_request_id(&headers), "trace-123");

        let empty: Vec<(String, String)> = Vec::new();
        assert!(Uuid::parse_str(&resolve_request_id(&empty)).is_ok());
    }
}

//! Metrics collection.
//!
//! # Metrics
//! - `portal_api_requests_total` (counter): API calls by method and outcome
//! - `portal_validation_failures_total` (counter): form submissions rejected locally
//! - `portal_credential_refreshes_total` (counter): identity pool refreshes by result

/// Record one API call. `outcome` is the status code for completed
/// exchanges or the error kind (`security`, `signing`, `timeout`, ...).
pub fn record_api_request(method: &str, outcome: &str) {
    metrics::counter!(
        "portal_api_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record a submission rejected by client-side validation.
pub fn record_validation_failure() {
    metrics::counter!("portal_validation_failures_total").increment(1);
}

/// Record an identity pool credential refresh.
pub fn record_credential_refresh(success: bool) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!("portal_credential_refreshes_total", "result" => result).increment(1);
}

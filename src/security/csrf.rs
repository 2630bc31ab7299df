//! CSRF token checks.
//!
//! This is a length check only. It does not verify the token against any
//! server-issued secret and must not be treated as cryptographic validation.

pub const CSRF_TOKEN_MIN_LEN: usize = 32;
pub const CSRF_TOKEN_MAX_LEN: usize = 128;

/// Accept non-empty tokens whose length lies in `[32, 128]`.
pub fn validate_csrf_token(token: &str) -> bool {
    let len = token.chars().count();
    (CSRF_TOKEN_MIN_LEN..=CSRF_TOKEN_MAX_LEN).contains(&len)
}

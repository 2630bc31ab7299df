//! Field-level sanitization.
//!
//! Every function here is pure. A value that cannot be normalized comes back
//! as `None`; callers report it as a validation error for that field.

use once_cell::sync::Lazy;
use regex::Regex;

/// Hard cap on description length, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

pub const PROJECT_NAME_MIN_LEN: usize = 3;
pub const PROJECT_NAME_MAX_LEN: usize = 63;

pub const USERNAME_MIN_LEN: usize = 2;
pub const USERNAME_MAX_LEN: usize = 50;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email pattern")
});

static PROJECT_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("project name pattern"));

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("username pattern"));

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

/// Trim Unicode whitespace and the byte-order mark (U+FEFF) from both ends.
///
/// `str::trim` keeps U+FEFF because it is not `White_Space`; a pasted BOM
/// would otherwise make a valid name fail its charset check.
pub fn trim_input(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Escape text for placement inside an HTML text node.
///
/// Only `&`, `<` and `>` are rewritten. Quotes are left alone because they
/// are inert in text content; use [`sanitize_html_attribute`] for values that
/// end up inside an attribute.
pub fn sanitize_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// Escape text for placement inside a quoted HTML attribute value.
pub fn sanitize_html_attribute(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

/// Trim, lowercase and validate an email address.
pub fn sanitize_email(s: &str) -> Option<String> {
    let normalized = trim_input(s).to_lowercase();
    EMAIL_RE.is_match(&normalized).then_some(normalized)
}

/// Trim, lowercase and validate a project name (`[a-z0-9-]`, 3 to 63 chars).
pub fn sanitize_project_name(s: &str) -> Option<String> {
    let normalized = trim_input(s).to_lowercase();
    let len = normalized.chars().count();
    let valid = PROJECT_NAME_RE.is_match(&normalized)
        && (PROJECT_NAME_MIN_LEN..=PROJECT_NAME_MAX_LEN).contains(&len);
    valid.then_some(normalized)
}

/// Validate a user identifier: an email when it contains `@`, otherwise a
/// bare username whose case is preserved.
pub fn sanitize_user_id(s: &str) -> Option<String> {
    let trimmed = trim_input(s);
    if trimmed.contains('@') {
        return sanitize_email(trimmed);
    }

    let len = trimmed.chars().count();
    let valid =
        USERNAME_RE.is_match(trimmed) && (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len);
    valid.then(|| trimmed.to_string())
}

/// Strip tag-like markup, trim, and cap at [`MAX_DESCRIPTION_CHARS`].
///
/// The cap is a plain character cut, not word-aware.
pub fn sanitize_description(s: &str) -> String {
    let stripped = TAG_RE.replace_all(s, "");
    trim_input(&stripped).chars().take(MAX_DESCRIPTION_CHARS).collect()
}

//! Deterministic bearer tokens.
//!
//! A token is [`TOKEN_PREFIX`] followed by the trimmed username. Tokens are
//! neither signed nor expiring and nothing is kept server-side.

use crate::constants::auth::TOKEN_PREFIX;

#[must_use]
pub fn issue(username: &str) -> String {
    format!("{TOKEN_PREFIX}{}", username.trim())
}

/// Extracts the trimmed username, or `None` when the prefix is missing.
#[must_use]
pub fn parse(token: &str) -> Option<&str> {
    token.strip_prefix(TOKEN_PREFIX).map(str::trim)
}

//! Where a request carries its session token.
//!
//! Clients may send the token in three places. They are checked in this
//! order and the first one present wins:
//!
//! 1. the `token` query parameter
//! 2. the `Authorization` header
//! 3. the `authorization` cookie
//!
//! Each may be written as `Bearer <token>` or as the bare token.

use crate::AuthError;

const BEARER_PREFIX: &str = "Bearer ";

/// The raw token-bearing fields of one request, as the HTTP layer found
/// them. Borrowed; nothing is copied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenCarrier<'a> {
    /// Value of the `token` query parameter.
    pub query: Option<&'a str>,
    /// Value of the `Authorization` header.
    pub header: Option<&'a str>,
    /// Value of the `authorization` cookie.
    pub cookie: Option<&'a str>,
}

impl<'a> TokenCarrier<'a> {
    /// Carrier with only the `Authorization` header set.
    pub fn from_header(header: &'a str) -> Self {
        Self {
            header: Some(header),
            ..Self::default()
        }
    }

    /// Returns the bare token from the highest-priority source present.
    ///
    /// # Errors
    /// Returns [`AuthError::MissingToken`] if no source holds a
    /// non-blank value.
    pub fn token(&self) -> Result<&'a str, AuthError> {
        [self.query, self.header, self.cookie]
            .into_iter()
            .flatten()
            .map(strip_bearer)
            .find(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)
    }
}

fn strip_bearer(raw: &str) -> &str {
    let raw = raw.trim_start();
    raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw).trim()
}

//! Unified error type for the Inkwell auth core.

use inkwell_session::SessionError;
use inkwell_token::TokenError;

use crate::StoreError;

/// Top-level error for login, authentication and logout flows.
///
/// Sub-crate errors convert in through `#[from]`, so `?` works across
/// layers. The remaining variants are the rejections a transport layer
/// maps to protocol responses, each with its own message.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The credential store said no.
    #[error("invalid account or password")]
    InvalidCredentials,

    /// No token was found in the query, header or cookie.
    #[error("no session token presented")]
    MissingToken,

    /// The token failed signature or structure checks.
    #[error("invalid session token")]
    InvalidToken,

    /// The token is genuine but stale. The client may log in again.
    #[error("session expired, please log in again")]
    TokenExpired,

    /// The token is genuine and fresh, but a newer login replaced it.
    #[error("this account has signed in elsewhere")]
    SignedInElsewhere,

    /// Configuration was missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The credential store could not answer.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Issuance failed (nonce or signing).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The token codec could not be built.
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl AuthError {
    /// `true` for rejections of the presented token or credentials, as
    /// opposed to server-side failures.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::MissingToken
                | Self::InvalidToken
                | Self::TokenExpired
                | Self::SignedInElsewhere
        )
    }
}

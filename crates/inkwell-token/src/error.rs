//! Error types for the token layer.
//!
//! Two kinds of failure live here and they are kept apart on purpose:
//!
//! - [`TokenError`] is a real error. It means the codec could not be built
//!   or could not produce a token at all. Issuance must abort.
//! - [`DecodeError`] is a *classification* of an untrusted input. Bad or
//!   stale tokens are expected traffic, so decoding returns this as plain
//!   data that callers `match` on.

/// Errors that can occur while constructing a codec or issuing a token.
///
/// `#[derive(thiserror::Error)]` auto-generates the `std::error::Error`
/// implementation; each `#[error("...")]` is the message shown in logs.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The signing secret was empty. An empty HMAC key would make every
    /// token trivially forgeable, so the codec refuses to exist.
    #[error("token signing secret must not be empty")]
    EmptySecret,

    /// The claims were rejected before signing (empty principal or nonce).
    #[error("invalid claims: {0}")]
    InvalidClaims(String),

    /// Serializing or signing the claim set failed.
    ///
    /// This wraps the underlying `jsonwebtoken` error. It is never expected
    /// in practice and is treated as fatal by the session layer.
    #[error("token encoding failed: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

/// Why a presented token was rejected by [`TokenCodec::decode`].
///
/// The signature is always checked before the expiry, so an `Expired`
/// result guarantees the token was genuinely issued by this codec.
///
/// [`TokenCodec::decode`]: crate::TokenCodec::decode
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Bad signature, wrong algorithm, broken base64/JSON, or missing or
    /// empty required claims. The string is a short reason for logging.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The signature is valid but the `exp` claim has passed.
    #[error("token expired")]
    Expired,
}

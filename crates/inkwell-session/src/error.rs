//! Error types for the session layer.

use inkwell_token::TokenError;

/// Errors that can occur while issuing a session.
///
/// Verification never errors: a rejected token is a
/// [`VerifyOutcome`](crate::VerifyOutcome), and a logout with nothing to
/// revoke is `false`. What remains are the failures that must abort a
/// login outright.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The principal identifier was empty.
    #[error("principal identifier must not be empty")]
    EmptyPrincipal,

    /// The operating system's random source failed while minting a nonce.
    /// Issuing a guessable nonce would be worse than issuing nothing.
    #[error("session nonce generation failed: {0}")]
    NonceGeneration(String),

    /// Signing the token failed.
    #[error(transparent)]
    Token(#[from] TokenError),
}

//! Session tokens for Inkwell.
//!
//! This crate defines what a session token IS and how it is checked:
//!
//! - **Claims** ([`TokenClaims`], [`PrincipalId`]): the typed payload
//!   every token carries (subject, session nonce, issue and expiry times).
//! - **Codec** ([`TokenCodec`] trait, [`Hs256Codec`]): how claims are
//!   signed into an opaque string and verified back.
//! - **Errors** ([`TokenError`], [`DecodeError`]): issuance failures and
//!   the classification of rejected tokens.
//!
//! # Architecture
//!
//! The token layer is self-contained: it knows nothing about which login
//! is current. It answers "is this token genuine, and is it still fresh?"
//! and nothing more.
//!
//! ```text
//! Gateway (login/logout) → Session (registry, single live login) → Token (sign/verify)
//! ```

mod claims;
mod codec;
mod error;

pub use claims::{PrincipalId, TokenClaims, unix_now};
pub use codec::{Hs256Codec, TokenCodec};
pub use error::{DecodeError, TokenError};

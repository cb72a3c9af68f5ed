//! The claim set carried inside every session token.
//!
//! A token answers three questions on its own, without any server lookup:
//! - WHO it was issued to (`principal`)
//! - WHICH login produced it (`nonce`)
//! - UNTIL WHEN it may be used (`expires_at`)
//!
//! Whether that login is still the principal's live one is NOT in the
//! token. That is the session registry's job.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PrincipalId
// ---------------------------------------------------------------------------

/// The account a session belongs to.
///
/// A newtype over `String` so a principal can't be mixed up with a nonce
/// or a raw token, even though all three are strings underneath.
///
/// `#[serde(transparent)]` serializes it as the bare string, so the JWT
/// payload reads `"sub": "alice"` rather than `"sub": {"0": "alice"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Wraps an account identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrows the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the identifier is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PrincipalId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for PrincipalId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ---------------------------------------------------------------------------
// TokenClaims
// ---------------------------------------------------------------------------

/// The typed payload of a session token.
///
/// Every field is required. A payload missing any of them fails to
/// deserialize, which the codec reports as malformed. The serde renames
/// map the fields onto the registered JWT claim names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// The account this token authenticates.
    #[serde(rename = "sub")]
    pub principal: PrincipalId,

    /// The per-login session nonce. Compared against the registry.
    pub nonce: String,

    /// Issue time, whole seconds since the Unix epoch.
    #[serde(rename = "iat")]
    pub issued_at: u64,

    /// Expiry, whole seconds since the Unix epoch. The token is expired
    /// once the clock reaches this value.
    #[serde(rename = "exp")]
    pub expires_at: u64,
}

impl TokenClaims {
    /// Returns `true` if the claims have expired at time `now`.
    ///
    /// The boundary is inclusive: at `now == expires_at` the token is
    /// already expired, so a zero TTL never produces a usable token.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}

/// Current wall-clock time in whole seconds since the Unix epoch.
///
/// Clocks set before 1970 read as 0 rather than failing.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

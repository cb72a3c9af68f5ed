//! Logout.

use std::sync::Arc;

use inkwell_token::{Hs256Codec, PrincipalId, TokenCodec};

use crate::SessionAuthority;

/// Result of a logout request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revocation {
    /// A live session existed and has been ended.
    Revoked,
    /// The principal had no live session. Not an error.
    NothingToRevoke,
}

impl Revocation {
    /// `true` if a session was actually ended.
    pub fn revoked(self) -> bool {
        matches!(self, Self::Revoked)
    }
}

/// Exposes logout on top of a shared [`SessionAuthority`].
///
/// Cloning is cheap; every clone talks to the same registry.
pub struct RevocationService<C: TokenCodec = Hs256Codec> {
    authority: Arc<SessionAuthority<C>>,
}

impl<C: TokenCodec> RevocationService<C> {
    /// Creates a revocation service backed by `authority`.
    pub fn new(authority: Arc<SessionAuthority<C>>) -> Self {
        Self { authority }
    }

    /// Ends the principal's live session.
    ///
    /// Every token the principal holds verifies as
    /// [`Superseded`](crate::VerifyOutcome::Superseded) afterwards.
    pub fn revoke(&self, principal: &PrincipalId) -> Revocation {
        if self.authority.revoke_session(principal) {
            Revocation::Revoked
        } else {
            Revocation::NothingToRevoke
        }
    }
}

// Derived `Clone` would demand `C: Clone`; only the `Arc` is cloned.
impl<C: TokenCodec> Clone for RevocationService<C> {
    fn clone(&self) -> Self {
        Self {
            authority: Arc::clone(&self.authority),
        }
    }
}

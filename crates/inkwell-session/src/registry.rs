//! The session registry: which login, if any, is each principal's live one.
//!
//! Tokens are self-contained and never stored. What the server DOES keep
//! is one small record per principal: the nonce of their most recent
//! login. A token is only honoured if its nonce matches that record.
//!
//! # Concurrency note
//!
//! `SessionRegistry` is NOT thread-safe by itself. It is a plain `HashMap`
//! behind `&mut self`. The [`SessionAuthority`](crate::SessionAuthority)
//! owns it inside a mutex, which is what makes `set_active`, `is_active`
//! and `clear` mutually exclusive.

use std::collections::HashMap;

use inkwell_token::PrincipalId;

/// One principal's live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Nonce of the most recent login.
    pub nonce: String,

    /// Expiry (Unix seconds) of the token issued with that nonce.
    /// Only consulted by [`SessionRegistry::evict_expired`].
    pub expires_at: u64,
}

/// Maps each principal to its single active session nonce.
///
/// ## Lifecycle
///
/// ```text
/// set_active(P, n1) ──→ [P → n1] ──set_active(P, n2)──→ [P → n2]
///                           │                               │
///                        clear(P)                        clear(P)
///                           ▼                               ▼
///                         [ ]                             [ ]
/// ```
///
/// A principal has at most one entry. Setting a new one is a replace,
/// never an insert alongside.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    entries: HashMap<PrincipalId, RegistryEntry>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `nonce` the principal's live session, unconditionally.
    ///
    /// Any previous session for the principal loses its authority at this
    /// instant. Nobody is notified; the old token simply stops verifying.
    ///
    /// Returns the displaced nonce, if there was one.
    pub fn set_active(
        &mut self,
        principal: PrincipalId,
        nonce: String,
        expires_at: u64,
    ) -> Option<String> {
        self.entries
            .insert(principal, RegistryEntry { nonce, expires_at })
            .map(|previous| previous.nonce)
    }

    /// Returns `true` if `nonce` is exactly the principal's live nonce.
    ///
    /// No entry at all counts as a mismatch.
    pub fn is_active(&self, principal: &PrincipalId, nonce: &str) -> bool {
        self.entries
            .get(principal)
            .is_some_and(|entry| entry.nonce == nonce)
    }

    /// Removes the principal's entry. Returns whether one existed.
    pub fn clear(&mut self, principal: &PrincipalId) -> bool {
        self.entries.remove(principal).is_some()
    }

    /// Removes the principal's entry only if its nonce is `nonce`.
    ///
    /// Returns `false`, leaving the registry as it was, when the entry is
    /// absent or holds a different nonce.
    pub fn clear_if_active(&mut self, principal: &PrincipalId, nonce: &str) -> bool {
        if self.is_active(principal, nonce) {
            self.entries.remove(principal);
            true
        } else {
            false
        }
    }

    /// Removes every entry whose token has expired at `now`.
    ///
    /// Returns the principals that were evicted, sorted for stable output.
    pub fn evict_expired(&mut self, now: u64) -> Vec<PrincipalId> {
        let mut evicted = Vec::new();
        self.entries.retain(|principal, entry| {
            if now >= entry.expires_at {
                evicted.push(principal.clone());
                false
            } else {
                true
            }
        });
        evicted.sort();
        evicted
    }

    /// Looks up the principal's entry.
    pub fn get(&self, principal: &PrincipalId) -> Option<&RegistryEntry> {
        self.entries.get(principal)
    }

    /// Returns the number of principals with a live session.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no principal has a live session.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================

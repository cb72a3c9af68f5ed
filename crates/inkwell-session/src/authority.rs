//! The session authority: issues tokens and classifies every token it is
//! shown.
//!
//! It combines the two halves of a session:
//! - the token (self-contained, signed, carries its own expiry), and
//! - the registry (which login is each principal's live one).
//!
//! A token is only [`VerifyOutcome::Valid`] when BOTH agree.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use inkwell_token::{DecodeError, Hs256Codec, PrincipalId, TokenClaims, TokenCodec, unix_now};

use crate::nonce::generate_nonce;
use crate::{SessionConfig, SessionError, SessionRegistry};

// ---------------------------------------------------------------------------
// VerifyOutcome
// ---------------------------------------------------------------------------

/// The classification of one presented token.
///
/// ```text
///   Issued ──→ Valid ──(clock passes exp)──────────────→ Expired
///                │
///                └──(same principal logs in again,
///                    or logs out)─────────────────────→ Superseded
///
///   any corrupted / forged string ───────────────────→ Malformed
/// ```
///
/// `Expired`, `Superseded` and `Malformed` are terminal: nothing turns
/// such a token back into `Valid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Genuine, fresh, and still the principal's live session.
    Valid(PrincipalId),

    /// Genuine but past its expiry. The client may log in again silently
    /// if it still holds credentials.
    Expired,

    /// Genuine and fresh, but a later login (or a logout) has taken its
    /// place. The "signed in elsewhere" case.
    Superseded,

    /// Bad signature or unparseable structure.
    Malformed,
}

impl VerifyOutcome {
    /// Returns `true` for [`VerifyOutcome::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// The authenticated principal, if the token was valid.
    pub fn principal(&self) -> Option<&PrincipalId> {
        match self {
            Self::Valid(principal) => Some(principal),
            _ => None,
        }
    }
}

impl fmt::Display for VerifyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(principal) => write!(f, "Valid({principal})"),
            Self::Expired => write!(f, "Expired"),
            Self::Superseded => write!(f, "Superseded"),
            Self::Malformed => write!(f, "Malformed"),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionAuthority
// ---------------------------------------------------------------------------

/// Issues, verifies and revokes sessions under a one-live-login-per-
/// principal policy.
///
/// The registry is handed in at construction rather than living in a
/// global, so every authority (and every test) has its own.
///
/// Share it across handlers with `Arc<SessionAuthority>`; all methods take
/// `&self`.
pub struct SessionAuthority<C: TokenCodec = Hs256Codec> {
    codec: C,
    registry: Mutex<SessionRegistry>,
    config: SessionConfig,
}

impl<C: TokenCodec> SessionAuthority<C> {
    /// Creates an authority from its parts.
    pub fn new(codec: C, registry: SessionRegistry, config: SessionConfig) -> Self {
        Self {
            codec,
            registry: Mutex::new(registry),
            config,
        }
    }

    /// Starts a new session for `principal` and returns its token.
    ///
    /// Called after the credential check has succeeded. Any session the
    /// principal already had is superseded the moment this returns.
    ///
    /// The token is signed BEFORE the registry is touched, so a failure
    /// here leaves the previous session untouched.
    ///
    /// # Errors
    /// - [`SessionError::EmptyPrincipal`]: empty identifier
    /// - [`SessionError::NonceGeneration`]: OS random source failed
    /// - [`SessionError::Token`]: signing failed
    pub fn issue_session(
        &self,
        principal: impl Into<PrincipalId>,
    ) -> Result<String, SessionError> {
        let principal = principal.into();
        if principal.is_empty() {
            return Err(SessionError::EmptyPrincipal);
        }

        let nonce = generate_nonce()?;
        let (token, claims) = self
            .codec
            .issue_at(&principal, &nonce, self.config.token_ttl, unix_now())?;
        let expires_at = claims.expires_at;

        let displaced = self
            .registry()
            .set_active(claims.principal, claims.nonce, expires_at);

        if displaced.is_some() {
            tracing::info!(%principal, expires_at, "session issued, previous session superseded");
        } else {
            tracing::info!(%principal, expires_at, "session issued");
        }

        Ok(token)
    }

    /// Classifies `token` against the current wall clock.
    pub fn verify_token(&self, token: &str) -> VerifyOutcome {
        self.verify_token_at(token, unix_now())
    }

    /// Classifies `token` as of `now` (Unix seconds).
    ///
    /// Signature and expiry are judged first, from the token alone. The
    /// registry is consulted only for a genuine, fresh token.
    pub fn verify_token_at(&self, token: &str, now: u64) -> VerifyOutcome {
        let claims = match self.decode_claims(token, now) {
            Ok(claims) => claims,
            Err(outcome) => return outcome,
        };

        if self.registry().is_active(&claims.principal, &claims.nonce) {
            VerifyOutcome::Valid(claims.principal)
        } else {
            tracing::debug!(principal = %claims.principal, "token rejected: superseded");
            VerifyOutcome::Superseded
        }
    }

    /// Ends the principal's live session, if any.
    ///
    /// Returns `false` when there was nothing to revoke. That is not an
    /// error: logging out twice is harmless.
    pub fn revoke_session(&self, principal: &PrincipalId) -> bool {
        let revoked = self.registry().clear(principal);
        if revoked {
            tracing::info!(%principal, "session revoked");
        } else {
            tracing::debug!(%principal, "revoke requested but no live session");
        }
        revoked
    }

    /// Ends the session `token` belongs to, but only while it is still the
    /// principal's live one.
    ///
    /// The nonce check and the removal happen under one lock, so a login
    /// that lands in between is never cleared by a stale token.
    ///
    /// Returns the token's classification at the moment of the call:
    /// `Valid(principal)` means that principal's session was ended.
    pub fn revoke_token(&self, token: &str) -> VerifyOutcome {
        let claims = match self.decode_claims(token, unix_now()) {
            Ok(claims) => claims,
            Err(outcome) => return outcome,
        };

        if self.registry().clear_if_active(&claims.principal, &claims.nonce) {
            tracing::info!(principal = %claims.principal, "session revoked by its token");
            VerifyOutcome::Valid(claims.principal)
        } else {
            tracing::debug!(principal = %claims.principal, "revoke rejected: superseded");
            VerifyOutcome::Superseded
        }
    }

    /// Evicts registry entries whose token has expired.
    ///
    /// Purely housekeeping: a token for an evicted entry was already
    /// `Expired`, and still is.
    pub fn purge_expired(&self) -> Vec<PrincipalId> {
        let evicted = self.registry().evict_expired(unix_now());
        if !evicted.is_empty() {
            tracing::debug!(count = evicted.len(), "evicted expired sessions");
        }
        evicted
    }

    /// Number of principals with a live session.
    pub fn active_sessions(&self) -> usize {
        self.registry().len()
    }

    /// The configuration this authority was built with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The codec used to sign and verify tokens.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Checks signature and expiry, mapping a rejection onto its outcome.
    fn decode_claims(&self, token: &str, now: u64) -> Result<TokenClaims, VerifyOutcome> {
        self.codec.decode_at(token, now).map_err(|err| match err {
            DecodeError::Malformed(reason) => {
                tracing::debug!(%reason, "token rejected: malformed");
                VerifyOutcome::Malformed
            }
            DecodeError::Expired => {
                tracing::debug!("token rejected: expired");
                VerifyOutcome::Expired
            }
        })
    }

    /// Locks the registry.
    ///
    /// A panic while the lock was held cannot leave the map half-updated
    /// (every mutation is a single `HashMap` call), so a poisoned lock is
    /// simply taken over.
    fn registry(&self) -> MutexGuard<'_, SessionRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: TokenCodec + fmt::Debug> fmt::Debug for SessionAuthority<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionAuthority")
            .field("codec", &self.codec)
            .field("active_sessions", &self.active_sessions())
            .field("config", &self.config)
            .finish()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `SessionAuthority`.
    //!
    //! Naming: `test_{function}_{scenario}_{expected}`.
    //!
    //! Time-dependent cases use either a zero TTL (expired on arrival) or
    //! `verify_token_at` with an explicit clock reading. Nothing sleeps.

    use std::time::Duration;

    use super::*;

    // -- Helpers ----------------------------------------------------------

    fn codec() -> Hs256Codec {
        Hs256Codec::new(b"unit-test-secret").unwrap()
    }

    /// Authority issuing 4-hour tokens.
    fn authority() -> SessionAuthority {
        SessionAuthority::new(codec(), SessionRegistry::new(), SessionConfig::default())
    }

    /// Authority whose tokens are expired the moment they are issued.
    fn authority_with_zero_ttl() -> SessionAuthority {
        SessionAuthority::new(
            codec(),
            SessionRegistry::new(),
            SessionConfig {
                token_ttl: Duration::ZERO,
                ..SessionConfig::default()
            },
        )
    }

    fn p(id: &str) -> PrincipalId {
        PrincipalId::from(id)
    }

    // =====================================================================
    // issue_session()
    // =====================================================================

    #[test]
    fn test_issue_session_fresh_token_is_valid() {
        let auth = authority();

        let token = auth.issue_session("alice").unwrap();

        assert_eq!(auth.verify_token(&token), VerifyOutcome::Valid(p("alice")));
    }

    #[test]
    fn test_issue_session_records_one_entry_per_principal() {
        let auth = authority();

        auth.issue_session("alice").unwrap();
        auth.issue_session("alice").unwrap();
        auth.issue_session("bob").unwrap();

        assert_eq!(auth.active_sessions(), 2);
    }

    #[test]
    fn test_issue_session_empty_principal_returns_error() {
        let auth = authority();

        let result = auth.issue_session("");

        assert!(matches!(result, Err(SessionError::EmptyPrincipal)));
        assert_eq!(auth.active_sessions(), 0);
    }

    #[test]
    fn test_issue_session_uses_configured_ttl() {
        let auth = authority();
        let token = auth.issue_session("alice").unwrap();

        let claims = auth.codec().decode(&token).unwrap();

        assert_eq!(claims.expires_at - claims.issued_at, 4 * 60 * 60);
    }

    #[test]
    fn test_issue_session_tokens_differ_per_login() {
        let auth = authority();

        let t1 = auth.issue_session("alice").unwrap();
        let t2 = auth.issue_session("alice").unwrap();

        assert_ne!(t1, t2);
    }

    // =====================================================================
    // verify_token()
    // =====================================================================

    #[test]
    fn test_verify_token_after_relogin_old_is_superseded() {
        let auth = authority();
        let t1 = auth.issue_session("alice").unwrap();
        assert_eq!(auth.verify_token(&t1), VerifyOutcome::Valid(p("alice")));

        let t2 = auth.issue_session("alice").unwrap();

        assert_eq!(auth.verify_token(&t1), VerifyOutcome::Superseded);
        assert_eq!(auth.verify_token(&t2), VerifyOutcome::Valid(p("alice")));
    }

    #[test]
    fn test_verify_token_other_principal_login_does_not_supersede() {
        let auth = authority();
        let alice = auth.issue_session("alice").unwrap();

        auth.issue_session("bob").unwrap();

        assert_eq!(auth.verify_token(&alice), VerifyOutcome::Valid(p("alice")));
    }

    #[test]
    fn test_verify_token_zero_ttl_returns_expired() {
        let auth = authority_with_zero_ttl();

        let token = auth.issue_session("alice").unwrap();

        assert_eq!(auth.verify_token(&token), VerifyOutcome::Expired);
    }

    #[test]
    fn test_verify_token_expired_while_nonce_still_active() {
        // The registry still names this nonce, but expiry is judged first.
        let auth = authority();
        let token = auth.issue_session("alice").unwrap();
        let far_future = unix_now() + 5 * 60 * 60;

        assert_eq!(auth.verify_token_at(&token, far_future), VerifyOutcome::Expired);
        assert_eq!(auth.active_sessions(), 1);
        assert_eq!(auth.verify_token(&token), VerifyOutcome::Valid(p("alice")));
    }

    #[test]
    fn test_verify_token_expired_and_superseded_reports_expired() {
        let auth = authority_with_zero_ttl();
        let t1 = auth.issue_session("alice").unwrap();
        auth.issue_session("alice").unwrap();

        assert_eq!(auth.verify_token(&t1), VerifyOutcome::Expired);
    }

    #[test]
    fn test_verify_token_garbage_returns_malformed() {
        let auth = authority();

        assert_eq!(auth.verify_token("Bearer nonsense"), VerifyOutcome::Malformed);
        assert_eq!(auth.verify_token(""), VerifyOutcome::Malformed);
    }

    #[test]
    fn test_verify_token_from_other_secret_returns_malformed() {
        let auth = authority();
        let other = SessionAuthority::new(
            Hs256Codec::new(b"a-different-secret").unwrap(),
            SessionRegistry::new(),
            SessionConfig::default(),
        );
        let foreign = other.issue_session("alice").unwrap();
        auth.issue_session("alice").unwrap();

        assert_eq!(auth.verify_token(&foreign), VerifyOutcome::Malformed);
    }

    #[test]
    fn test_verify_token_signed_but_never_registered_is_superseded() {
        // A correctly signed token whose nonce the registry never saw.
        let auth = authority();
        let token = auth
            .codec()
            .issue(&p("bob"), "0123456789abcdef", Duration::from_secs(60))
            .unwrap();

        assert_eq!(auth.verify_token(&token), VerifyOutcome::Superseded);
    }

    // =====================================================================
    // revoke_session()
    // =====================================================================

    #[test]
    fn test_revoke_session_live_session_returns_true_and_supersedes() {
        let auth = authority();
        let token = auth.issue_session("alice").unwrap();

        assert!(auth.revoke_session(&p("alice")));

        assert_eq!(auth.verify_token(&token), VerifyOutcome::Superseded);
        assert_eq!(auth.active_sessions(), 0);
    }

    #[test]
    fn test_revoke_session_without_session_returns_false() {
        let auth = authority();

        assert!(!auth.revoke_session(&p("bob")));
    }

    #[test]
    fn test_revoke_session_leaves_other_principals_alone() {
        let auth = authority();
        auth.issue_session("alice").unwrap();
        let bob = auth.issue_session("bob").unwrap();

        auth.revoke_session(&p("alice"));

        assert_eq!(auth.verify_token(&bob), VerifyOutcome::Valid(p("bob")));
    }

    // =====================================================================
    // revoke_token()
    // =====================================================================

    #[test]
    fn test_revoke_token_live_token_ends_session() {
        let auth = authority();
        let token = auth.issue_session("alice").unwrap();

        assert_eq!(auth.revoke_token(&token), VerifyOutcome::Valid(p("alice")));

        assert_eq!(auth.verify_token(&token), VerifyOutcome::Superseded);
        assert_eq!(auth.active_sessions(), 0);
    }

    #[test]
    fn test_revoke_token_stale_after_check_keeps_newer_session() {
        let auth = authority();
        let old = auth.issue_session("alice").unwrap();
        // The old token passes a check, then a new login lands before the
        // logout is applied.
        assert!(auth.verify_token(&old).is_valid());
        let new = auth.issue_session("alice").unwrap();

        assert_eq!(auth.revoke_token(&old), VerifyOutcome::Superseded);

        assert_eq!(auth.verify_token(&new), VerifyOutcome::Valid(p("alice")));
        assert_eq!(auth.active_sessions(), 1);
    }

    #[test]
    fn test_revoke_token_expired_leaves_registry_alone() {
        let auth = authority_with_zero_ttl();
        let token = auth.issue_session("alice").unwrap();

        assert_eq!(auth.revoke_token(&token), VerifyOutcome::Expired);
        assert_eq!(auth.active_sessions(), 1);
    }

    #[test]
    fn test_revoke_token_garbage_returns_malformed() {
        let auth = authority();
        auth.issue_session("alice").unwrap();

        assert_eq!(auth.revoke_token("not.a.token"), VerifyOutcome::Malformed);
        assert_eq!(auth.active_sessions(), 1);
    }

    // =====================================================================
    // purge_expired()
    // =====================================================================

    #[test]
    fn test_purge_expired_evicts_zero_ttl_sessions() {
        let auth = authority_with_zero_ttl();
        let token = auth.issue_session("alice").unwrap();

        let evicted = auth.purge_expired();

        assert_eq!(evicted, vec![p("alice")]);
        assert_eq!(auth.active_sessions(), 0);
        // Eviction doesn't change the classification.
        assert_eq!(auth.verify_token(&token), VerifyOutcome::Expired);
    }

    #[test]
    fn test_purge_expired_keeps_fresh_sessions() {
        let auth = authority();
        auth.issue_session("alice").unwrap();

        assert!(auth.purge_expired().is_empty());
        assert_eq!(auth.active_sessions(), 1);
    }

    // =====================================================================
    // VerifyOutcome
    // =====================================================================

    #[test]
    fn test_verify_outcome_principal_only_when_valid() {
        assert_eq!(VerifyOutcome::Valid(p("alice")).principal(), Some(&p("alice")));
        assert!(VerifyOutcome::Valid(p("alice")).is_valid());
        assert_eq!(VerifyOutcome::Expired.principal(), None);
        assert!(!VerifyOutcome::Superseded.is_valid());
    }

    #[test]
    fn test_verify_outcome_display() {
        assert_eq!(VerifyOutcome::Valid(p("alice")).to_string(), "Valid(alice)");
        assert_eq!(VerifyOutcome::Malformed.to_string(), "Malformed");
    }
}

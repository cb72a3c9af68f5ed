//! Login, request authentication and logout.
//!
//! This is what the HTTP handlers call. Each flow is one method:
//!
//! ```text
//! login(principal, secret)  → check credentials → issue_session → token
//! authenticate(carrier)     → extract token     → verify_token  → principal
//! logout(carrier)           → extract token     → revoke_token  → principal
//! ```
//!
//! Mapping the results onto status codes and response bodies is left to
//! the caller.

use std::sync::Arc;

use inkwell_session::{RevocationService, SessionAuthority, VerifyOutcome};
use inkwell_token::{Hs256Codec, PrincipalId, TokenCodec};

use crate::{AuthError, CredentialStore, TokenCarrier};

/// Ties a credential store to a shared [`SessionAuthority`].
pub struct AuthGateway<S: CredentialStore, C: TokenCodec = Hs256Codec> {
    store: S,
    authority: Arc<SessionAuthority<C>>,
    revocation: RevocationService<C>,
}

impl<S: CredentialStore, C: TokenCodec> AuthGateway<S, C> {
    /// Creates a gateway over `store` and `authority`.
    pub fn new(store: S, authority: Arc<SessionAuthority<C>>) -> Self {
        let revocation = RevocationService::new(Arc::clone(&authority));
        Self {
            store,
            authority,
            revocation,
        }
    }

    /// Checks the credentials and, if they are right, starts a session.
    ///
    /// Any session the principal already had (another browser, another
    /// device) is superseded.
    ///
    /// # Errors
    /// - [`AuthError::InvalidCredentials`]: unknown account or wrong secret
    /// - [`AuthError::Store`]: the credential store failed
    /// - [`AuthError::Session`]: issuance failed
    pub async fn login(
        &self,
        principal: impl Into<PrincipalId>,
        secret: &str,
    ) -> Result<String, AuthError> {
        let principal = principal.into();

        if !self.store.check_credentials(&principal, secret).await? {
            tracing::info!(%principal, "login rejected: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.authority.issue_session(principal.clone())?;
        tracing::info!(%principal, "login succeeded");
        Ok(token)
    }

    /// Resolves a bare token to the principal it authenticates.
    ///
    /// # Errors
    /// One of [`AuthError::InvalidToken`], [`AuthError::TokenExpired`] or
    /// [`AuthError::SignedInElsewhere`].
    pub fn authenticate(&self, token: &str) -> Result<PrincipalId, AuthError> {
        accept(self.authority.verify_token(token))
    }

    /// Extracts the token from a request's carrier fields and
    /// authenticates it.
    ///
    /// # Errors
    /// [`AuthError::MissingToken`], or anything from
    /// [`authenticate`](Self::authenticate).
    pub fn authenticate_request(&self, carrier: &TokenCarrier<'_>) -> Result<PrincipalId, AuthError> {
        self.authenticate(carrier.token()?)
    }

    /// Logs out the principal holding `token` and returns who it was.
    ///
    /// Only the live session can log out: a stale or superseded token is
    /// rejected rather than used to end someone's newer session, even when
    /// that newer login races with this call.
    ///
    /// # Errors
    /// Anything from [`authenticate`](Self::authenticate).
    pub fn logout(&self, token: &str) -> Result<PrincipalId, AuthError> {
        let principal = accept(self.authority.revoke_token(token))?;
        tracing::info!(%principal, "logout");
        Ok(principal)
    }

    /// [`logout`](Self::logout) with the token taken from the carrier.
    ///
    /// # Errors
    /// [`AuthError::MissingToken`], or anything from `logout`.
    pub fn logout_request(&self, carrier: &TokenCarrier<'_>) -> Result<PrincipalId, AuthError> {
        self.logout(carrier.token()?)
    }

    /// The shared authority.
    pub fn authority(&self) -> &Arc<SessionAuthority<C>> {
        &self.authority
    }

    /// The logout service, for callers that revoke by principal directly
    /// (an admin disabling an account, for instance).
    pub fn revocation(&self) -> &RevocationService<C> {
        &self.revocation
    }
}

/// Maps a token's outcome onto the principal or the matching rejection.
fn accept(outcome: VerifyOutcome) -> Result<PrincipalId, AuthError> {
    match outcome {
        VerifyOutcome::Valid(principal) => Ok(principal),
        VerifyOutcome::Expired => Err(AuthError::TokenExpired),
        VerifyOutcome::Superseded => Err(AuthError::SignedInElsewhere),
        VerifyOutcome::Malformed => Err(AuthError::InvalidToken),
    }
}

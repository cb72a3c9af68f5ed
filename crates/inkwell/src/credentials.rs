//! Credential-check hook.
//!
//! Inkwell doesn't store passwords. Checking them is the job of whatever
//! holds the user table. The [`CredentialStore`] trait is the seam: one
//! async method that answers "is this secret right for this principal?".

use std::collections::HashMap;
use std::future::Future;

use inkwell_token::PrincipalId;

/// The credential store could not be reached or failed to answer.
///
/// A wrong password is NOT a `StoreError`; that is `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("credential store unavailable: {0}")]
pub struct StoreError(pub String);

/// Answers whether a presented secret is correct for a principal.
///
/// - `Send + Sync + 'static` → shared by every request task for the
///   lifetime of the server.
pub trait CredentialStore: Send + Sync + 'static {
    /// Returns `Ok(true)` if `secret` is the principal's credential.
    ///
    /// Unknown principals return `Ok(false)`, indistinguishable from a
    /// wrong secret.
    fn check_credentials(
        &self,
        principal: &PrincipalId,
        secret: &str,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// A [`CredentialStore`] backed by an in-memory map.
///
/// For tests and local demos. Secrets are compared as given; whatever
/// hashing the real store does is out of scope here.
#[derive(Debug, Default, Clone)]
pub struct MemoryCredentialStore {
    accounts: HashMap<PrincipalId, String>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) an account. Builder-style.
    pub fn with_account(mut self, principal: impl Into<PrincipalId>, secret: impl Into<String>) -> Self {
        self.accounts.insert(principal.into(), secret.into());
        self
    }
}

impl CredentialStore for MemoryCredentialStore {
    async fn check_credentials(
        &self,
        principal: &PrincipalId,
        secret: &str,
    ) -> Result<bool, StoreError> {
        Ok(self
            .accounts
            .get(principal)
            .is_some_and(|stored| stored == secret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryCredentialStore {
        MemoryCredentialStore::new().with_account("alice", "correct horse")
    }

    #[tokio::test]
    async fn test_check_credentials_correct_secret_returns_true() {
        let ok = store()
            .check_credentials(&PrincipalId::from("alice"), "correct horse")
            .await
            .unwrap();
        assert!(ok);
    }

    #[tokio::test]
    async fn test_check_credentials_wrong_secret_returns_false() {
        let ok = store()
            .check_credentials(&PrincipalId::from("alice"), "battery staple")
            .await
            .unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn test_check_credentials_unknown_principal_returns_false() {
        let ok = store()
            .check_credentials(&PrincipalId::from("mallory"), "correct horse")
            .await
            .unwrap();
        assert!(!ok);
    }
}

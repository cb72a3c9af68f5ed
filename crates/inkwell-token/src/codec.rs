//! Codec trait and implementation for signing and verifying session tokens.
//!
//! The session layer doesn't care HOW a token is laid out on the wire. It
//! only needs something that implements [`TokenCodec`]: turn a claim set
//! into an opaque string, and turn an untrusted string back into claims
//! (or a reason it was rejected).
//!
//! [`Hs256Codec`] is the provided implementation: a compact JWT signed
//! with HMAC-SHA256 under a single process-wide secret.

use std::fmt;
use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::{DecodeError, PrincipalId, TokenClaims, TokenError, unix_now};

/// Signs claim sets into tokens and verifies tokens back into claims.
///
/// ## Trait bounds explained
///
/// - `Send + Sync` → one codec is shared by every request handler,
///   possibly on different threads.
/// - `'static` → it owns its keys and borrows nothing temporary.
///
/// ## Ordering guarantee
///
/// Implementations MUST verify integrity before looking at `exp`. An
/// [`DecodeError::Expired`] result therefore always refers to a token
/// this codec really issued.
pub trait TokenCodec: Send + Sync + 'static {
    /// Signs an already-built claim set.
    ///
    /// # Errors
    /// Returns [`TokenError::Encode`] if serialization or signing fails.
    fn encode(&self, claims: &TokenClaims) -> Result<String, TokenError>;

    /// Verifies `token` and checks its expiry against `now` (Unix seconds).
    fn decode_at(&self, token: &str, now: u64) -> Result<TokenClaims, DecodeError>;

    /// Builds claims for `principal`/`nonce` valid for `ttl` from now, and
    /// signs them.
    ///
    /// Sub-second parts of `ttl` are dropped; the token format only
    /// carries whole seconds.
    ///
    /// # Errors
    /// - [`TokenError::InvalidClaims`] for an empty principal or nonce
    /// - [`TokenError::Encode`] if signing fails
    fn issue(
        &self,
        principal: &PrincipalId,
        nonce: &str,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        self.issue_at(principal, nonce, ttl, unix_now())
            .map(|(token, _)| token)
    }

    /// Like [`issue`](Self::issue), issued at `now` (Unix seconds), and
    /// also returns the claims that were signed.
    ///
    /// # Errors
    /// Same as [`issue`](Self::issue).
    fn issue_at(
        &self,
        principal: &PrincipalId,
        nonce: &str,
        ttl: Duration,
        now: u64,
    ) -> Result<(String, TokenClaims), TokenError> {
        if principal.is_empty() {
            return Err(TokenError::InvalidClaims("empty principal".into()));
        }
        if nonce.is_empty() {
            return Err(TokenError::InvalidClaims("empty nonce".into()));
        }

        let claims = TokenClaims {
            principal: principal.clone(),
            nonce: nonce.to_owned(),
            issued_at: now,
            expires_at: now.saturating_add(ttl.as_secs()),
        };
        let token = self.encode(&claims)?;
        Ok((token, claims))
    }

    /// Verifies `token` against the current wall clock.
    fn decode(&self, token: &str) -> Result<TokenClaims, DecodeError> {
        self.decode_at(token, unix_now())
    }
}

// ---------------------------------------------------------------------------
// Hs256Codec
// ---------------------------------------------------------------------------

/// A [`TokenCodec`] producing compact HS256 JWTs.
///
/// Wire format: `base64url(header).base64url(claims).base64url(hmac)`
/// with claims `{"sub", "nonce", "iat", "exp"}`.
///
/// Expiry is NOT checked by `jsonwebtoken` itself (its validator has a
/// default leeway and an exclusive boundary). We switch that off and
/// compare `exp` ourselves after the signature has passed.
#[derive(Clone)]
pub struct Hs256Codec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256Codec {
    /// Creates a codec keyed by `secret`.
    ///
    /// # Errors
    /// Returns [`TokenError::EmptySecret`] if `secret` is empty.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, TokenError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        })
    }
}

// Keys stay out of Debug output.
impl fmt::Debug for Hs256Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hs256Codec")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}

impl TokenCodec for Hs256Codec {
    fn encode(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(TokenError::Encode)
    }

    fn decode_at(&self, token: &str, now: u64) -> Result<TokenClaims, DecodeError> {
        // Signature, algorithm, structure and claim shape, in that order.
        let claims = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| DecodeError::Malformed(malformed_reason(e.kind())))?
            .claims;

        if claims.principal.is_empty() {
            return Err(DecodeError::Malformed("empty subject".into()));
        }
        if claims.nonce.is_empty() {
            return Err(DecodeError::Malformed("empty nonce".into()));
        }

        if claims.is_expired_at(now) {
            tracing::trace!(principal = %claims.principal, exp = claims.expires_at, now, "token expired");
            return Err(DecodeError::Expired);
        }

        Ok(claims)
    }
}

/// Short, log-safe description of why `jsonwebtoken` rejected a token.
fn malformed_reason(kind: &ErrorKind) -> String {
    match kind {
        ErrorKind::InvalidSignature => "bad signature".into(),
        ErrorKind::InvalidAlgorithm => "unexpected algorithm".into(),
        ErrorKind::InvalidToken => "not a compact token".into(),
        ErrorKind::Base64(_) => "invalid base64".into(),
        ErrorKind::Json(_) => "invalid claims".into(),
        ErrorKind::Utf8(_) => "invalid utf-8".into(),
        ErrorKind::MissingRequiredClaim(claim) => format!("missing claim `{claim}`"),
        other => format!("{other:?}"),
    }
}

// =========================================================================
// Tests
// =========================================================================

//! Session nonce generation.

use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::SessionError;

/// Number of random bytes in a nonce (128 bits).
const NONCE_BYTES: usize = 16;

/// Mints a fresh session nonce: 32 lowercase hex characters read straight
/// from the operating system's CSPRNG.
///
/// # Errors
/// Returns [`SessionError::NonceGeneration`] if the OS random source is
/// unavailable. The caller must abort the login.
pub(crate) fn generate_nonce() -> Result<String, SessionError> {
    let mut bytes = [0u8; NONCE_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| SessionError::NonceGeneration(e.to_string()))?;
    Ok(bytes.iter().map(|b| format!("{b:02x}")).collect())
}

//! Session authority configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default lifetime of an issued token: 4 hours.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(4 * 60 * 60);

/// Configuration for session issuance and housekeeping.
///
/// Construct with `SessionConfig::default()` and override the fields you
/// care about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long an issued token stays usable.
    ///
    /// Only whole seconds are encoded into the token. A zero TTL yields
    /// tokens that are already expired.
    pub token_ttl: Duration,

    /// How often to evict registry entries whose token has expired.
    ///
    /// `None` keeps every entry until it is replaced by a new login or
    /// cleared by logout. Eviction only frees memory; it never changes
    /// how a token verifies.
    pub sweep_interval: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_ttl: DEFAULT_TOKEN_TTL,
            sweep_interval: None,
        }
    }
}

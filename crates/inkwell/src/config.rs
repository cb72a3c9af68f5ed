//! Top-level configuration: signing secret plus session settings.

use std::fmt;
use std::time::Duration;

use inkwell_session::{SessionAuthority, SessionConfig, SessionRegistry};
use inkwell_token::Hs256Codec;
use serde::Deserialize;

use crate::AuthError;

/// Environment variable holding the token signing secret. Required.
pub const ENV_TOKEN_SECRET: &str = "INKWELL_TOKEN_SECRET";
/// Environment variable overriding the token TTL, in seconds.
pub const ENV_TOKEN_TTL_SECS: &str = "INKWELL_TOKEN_TTL_SECS";
/// Environment variable enabling the stale-entry sweeper, in seconds.
/// `0` disables it.
pub const ENV_SWEEP_INTERVAL_SECS: &str = "INKWELL_SWEEP_INTERVAL_SECS";

/// Everything needed to build a [`SessionAuthority`].
#[derive(Clone, Deserialize)]
pub struct InkwellConfig {
    /// HMAC secret shared by every token this process issues.
    pub token_secret: String,

    /// TTL and sweeper settings.
    #[serde(default)]
    pub session: SessionConfig,
}

impl InkwellConfig {
    /// Config with the given secret and default session settings.
    pub fn new(token_secret: impl Into<String>) -> Self {
        Self {
            token_secret: token_secret.into(),
            session: SessionConfig::default(),
        }
    }

    /// Reads the config from the process environment.
    ///
    /// # Errors
    /// [`AuthError::Config`] if the secret is missing or blank, or a
    /// duration is not a whole number of seconds.
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the config through `lookup`, which maps a variable name to
    /// its value. `from_env` is this with `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token_secret = lookup(ENV_TOKEN_SECRET)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AuthError::Config(format!("{ENV_TOKEN_SECRET} is not set")))?;

        let mut session = SessionConfig::default();
        if let Some(secs) = parse_secs(&lookup, ENV_TOKEN_TTL_SECS)? {
            session.token_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_secs(&lookup, ENV_SWEEP_INTERVAL_SECS)? {
            session.sweep_interval = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(Self {
            token_secret,
            session,
        })
    }

    /// Builds the codec, an empty registry and the authority.
    ///
    /// # Errors
    /// [`AuthError::Token`] if the secret is empty.
    pub fn build_authority(&self) -> Result<SessionAuthority, AuthError> {
        let codec = Hs256Codec::new(self.token_secret.as_bytes())?;
        Ok(SessionAuthority::new(
            codec,
            SessionRegistry::new(),
            self.session.clone(),
        ))
    }
}

// The secret stays out of Debug output.
impl fmt::Debug for InkwellConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InkwellConfig")
            .field("token_secret", &"<redacted>")
            .field("session", &self.session)
            .finish()
    }
}

fn parse_secs<F>(lookup: &F, key: &str) -> Result<Option<u64>, AuthError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|_| AuthError::Config(format!("{key} must be whole seconds, got {raw:?}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_secret_only_uses_defaults() {
        let config = InkwellConfig::from_lookup(lookup(&[(ENV_TOKEN_SECRET, "s3cret")])).unwrap();

        assert_eq!(config.token_secret, "s3cret");
        assert_eq!(config.session, SessionConfig::default());
    }

    #[test]
    fn test_from_lookup_overrides_ttl_and_sweep() {
        let config = InkwellConfig::from_lookup(lookup(&[
            (ENV_TOKEN_SECRET, "s3cret"),
            (ENV_TOKEN_TTL_SECS, "7200"),
            (ENV_SWEEP_INTERVAL_SECS, "300"),
        ]))
        .unwrap();

        assert_eq!(config.session.token_ttl, Duration::from_secs(7200));
        assert_eq!(config.session.sweep_interval, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_from_lookup_zero_sweep_disables_sweeper() {
        let config = InkwellConfig::from_lookup(lookup(&[
            (ENV_TOKEN_SECRET, "s3cret"),
            (ENV_SWEEP_INTERVAL_SECS, "0"),
        ]))
        .unwrap();

        assert_eq!(config.session.sweep_interval, None);
    }

    #[test]
    fn test_from_lookup_missing_secret_returns_config_error() {
        let result = InkwellConfig::from_lookup(lookup(&[]));
        assert!(matches!(result, Err(AuthError::Config(msg)) if msg.contains(ENV_TOKEN_SECRET)));
    }

    #[test]
    fn test_from_lookup_blank_secret_returns_config_error() {
        let result = InkwellConfig::from_lookup(lookup(&[(ENV_TOKEN_SECRET, "  ")]));
        assert!(matches!(result, Err(AuthError::Config(_))));
    }

    #[test]
    fn test_from_lookup_bad_ttl_returns_config_error() {
        let result = InkwellConfig::from_lookup(lookup(&[
            (ENV_TOKEN_SECRET, "s3cret"),
            (ENV_TOKEN_TTL_SECS, "4h"),
        ]));
        assert!(matches!(result, Err(AuthError::Config(msg)) if msg.contains("4h")));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let printed = format!("{:?}", InkwellConfig::new("hunter2"));
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("redacted"));
    }

    #[test]
    fn test_deserialize_without_session_uses_defaults() {
        let config: InkwellConfig = serde_json::from_str(r#"{ "token_secret": "s3cret" }"#).unwrap();
        assert_eq!(config.session, SessionConfig::default());
    }

    #[test]
    fn test_build_authority_empty_secret_returns_token_error() {
        let result = InkwellConfig::new("").build_authority();
        assert!(matches!(result, Err(AuthError::Token(_))));
    }

    #[test]
    fn test_build_authority_issues_verifiable_tokens() {
        let authority = InkwellConfig::new("s3cret").build_authority().unwrap();
        let token = authority.issue_session("alice").unwrap();
        assert!(authority.verify_token(&token).is_valid());
    }
}

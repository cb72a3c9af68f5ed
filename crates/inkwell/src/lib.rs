//! # Inkwell
//!
//! Session authentication core for the Inkwell blog backend.
//!
//! Every account may have exactly one live login. Logging in again from
//! anywhere silently retires the previous session, whose token then
//! reports "signed in elsewhere". Tokens are signed, self-contained and
//! time-limited; the only server-side state is one nonce per account.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use inkwell::prelude::*;
//!
//! # async fn run() -> Result<(), AuthError> {
//! let config = InkwellConfig::from_env()?;
//! let authority = Arc::new(config.build_authority()?);
//! let _sweeper = spawn_configured_sweeper(&authority);
//!
//! let store = MemoryCredentialStore::new().with_account("alice", "wonderland");
//! let gateway = AuthGateway::new(store, authority);
//!
//! let token = gateway.login("alice", "wonderland").await?;
//! let header = format!("Bearer {token}");
//! let who = gateway.authenticate_request(&TokenCarrier::from_header(&header))?;
//! assert_eq!(who.as_str(), "alice");
//! # Ok(())
//! # }
//! ```

mod carrier;
mod config;
mod credentials;
mod error;
mod gateway;
mod sweeper;
mod telemetry;

pub use carrier::TokenCarrier;
pub use config::{ENV_SWEEP_INTERVAL_SECS, ENV_TOKEN_SECRET, ENV_TOKEN_TTL_SECS, InkwellConfig};
pub use credentials::{CredentialStore, MemoryCredentialStore, StoreError};
pub use error::AuthError;
pub use gateway::AuthGateway;
pub use sweeper::{spawn_configured_sweeper, spawn_sweeper};
pub use telemetry::init_tracing;

/// Re-exports of the sub-crates.
pub use inkwell_session as session;
pub use inkwell_token as token;

/// Everything needed to wire up login, authentication and logout.
pub mod prelude {
    pub use crate::{
        AuthError, AuthGateway, CredentialStore, InkwellConfig, MemoryCredentialStore, StoreError,
        TokenCarrier, init_tracing, spawn_configured_sweeper, spawn_sweeper,
    };
    pub use inkwell_session::{
        Revocation, RevocationService, SessionAuthority, SessionConfig, SessionError,
        SessionRegistry, VerifyOutcome,
    };
    pub use inkwell_token::{DecodeError, Hs256Codec, PrincipalId, TokenClaims, TokenCodec, TokenError};
}

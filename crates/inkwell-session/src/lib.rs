//! Session management for Inkwell.
//!
//! This crate enforces the single-live-session policy:
//!
//! 1. **Issuance**: a successful login mints a nonce, records it as the
//!    principal's live session, and hands back a signed token
//!    ([`SessionAuthority::issue_session`])
//! 2. **Verification**: every request's token is classified as
//!    [`VerifyOutcome::Valid`], `Expired`, `Superseded` or `Malformed`
//! 3. **Revocation**: logout clears the live session
//!    ([`RevocationService`])
//!
//! Logging in again anywhere silently supersedes the previous login: its
//! token keeps a valid signature but no longer matches the registry.
//!
//! # How it fits in the stack
//!
//! ```text
//! Gateway (above)        ← login/logout flows, credential store
//!     ↕
//! Session (this crate)   ← which login is live, per principal
//!     ↕
//! Token (below)          ← signed claims, expiry
//! ```
//!
//! Sessions live in process memory only. A restart logs everyone out.

mod authority;
mod config;
mod error;
mod nonce;
mod registry;
mod revocation;

pub use authority::{SessionAuthority, VerifyOutcome};
pub use config::{DEFAULT_TOKEN_TTL, SessionConfig};
pub use error::SessionError;
pub use registry::{RegistryEntry, SessionRegistry};
pub use revocation::{Revocation, RevocationService};

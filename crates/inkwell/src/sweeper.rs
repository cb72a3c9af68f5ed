//! Background eviction of registry entries whose token has expired.
//!
//! Without it, a principal who logs in once and never again keeps one
//! small entry until the process restarts. The sweeper reclaims those.
//! It never affects a verification result: an expired token is reported
//! `Expired` before the registry is looked at.

use std::sync::Arc;
use std::time::Duration;

use inkwell_session::SessionAuthority;
use inkwell_token::TokenCodec;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Spawns a task that calls [`SessionAuthority::purge_expired`] every
/// `every` (at least one second). The first sweep runs immediately.
///
/// Missed ticks are skipped rather than bunched up. Abort the returned
/// handle to stop sweeping.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_sweeper<C: TokenCodec>(
    authority: Arc<SessionAuthority<C>>,
    every: Duration,
) -> JoinHandle<()> {
    // `time::interval` panics on a zero period.
    let every = every.max(Duration::from_secs(1));

    tokio::spawn(async move {
        let mut interval = time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::debug!(interval_secs = every.as_secs(), "session sweeper started");

        loop {
            interval.tick().await;
            let evicted = authority.purge_expired();
            tracing::trace!(evicted = evicted.len(), remaining = authority.active_sessions(), "sweep done");
        }
    })
}

/// Spawns the sweeper if the authority's config asks for one.
pub fn spawn_configured_sweeper<C: TokenCodec>(
    authority: &Arc<SessionAuthority<C>>,
) -> Option<JoinHandle<()>> {
    authority
        .config()
        .sweep_interval
        .map(|every| spawn_sweeper(Arc::clone(authority), every))
}

use std::sync::Arc;
use std::time::Duration;

use inkwell::prelude::*;

// Used when INKWELL_TOKEN_SECRET is unset. Never deploy with this.
const DEV_SECRET: &str = "inkwell-dev-secret-change-me";

#[tokio::main]
async fn main() -> Result<(), AuthError> {
    init_tracing();

    let config = match InkwellConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "falling back to development config");
            let mut config = InkwellConfig::new(DEV_SECRET);
            config.session.sweep_interval = Some(Duration::from_secs(60));
            config
        }
    };
    tracing::info!(?config, "starting");

    let authority = Arc::new(config.build_authority()?);
    let sweeper = spawn_configured_sweeper(&authority);

    let store = MemoryCredentialStore::new()
        .with_account("alice", "wonderland")
        .with_account("bob", "builder");
    let gateway = AuthGateway::new(store, Arc::clone(&authority));

    // 1. Alice logs in on her laptop.
    let laptop = gateway.login("alice", "wonderland").await?;
    let laptop_header = format!("Bearer {laptop}");
    report("laptop", gateway.authenticate_request(&TokenCarrier::from_header(&laptop_header)));

    // 2. A wrong password changes nothing.
    if let Err(e) = gateway.login("alice", "looking-glass").await {
        tracing::info!(error = %e, "bad password rejected");
    }
    report("laptop", gateway.authenticate(&laptop));

    // 3. She logs in again on her phone; the laptop session is gone.
    let phone = gateway.login("alice", "wonderland").await?;
    report("laptop", gateway.authenticate(&laptop));
    report("phone", gateway.authenticate(&phone));

    // 4. Bob has no session, so a logout by principal is a no-op.
    let bob = PrincipalId::from("bob");
    tracing::info!(result = ?gateway.revocation().revoke(&bob), "bob revoke without session");

    // 5. A token with its signature tampered with.
    let tampered = format!("{phone}x");
    report("tampered", gateway.authenticate(&tampered));

    // 6. Alice logs out from her phone.
    let principal = gateway.logout(&phone)?;
    tracing::info!(%principal, "phone logout");
    report("phone", gateway.authenticate(&phone));

    tracing::info!(active = authority.active_sessions(), "done");

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    Ok(())
}

fn report(device: &str, result: Result<PrincipalId, AuthError>) {
    match result {
        Ok(principal) => tracing::info!(device, %principal, "authenticated"),
        Err(e) => tracing::info!(device, error = %e, "rejected"),
    }
}

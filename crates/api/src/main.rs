use std::sync::Arc;

use anyhow::Context;

use crewdash_api::config::AppConfig;
use crewdash_auth::InMemoryIdentityProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    crewdash_observability::init(config.log_format());

    // The in-memory provider with seeded dev accounts is the only bundled provider.
    tracing::warn!("no external identity provider configured; using in-memory dev accounts");
    let provider = Arc::new(InMemoryIdentityProvider::with_dev_accounts().await);

    let addr = config.socket_addr();
    let environment = config.environment;
    let app = crewdash_api::app::build_app(config, provider);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%environment, "listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

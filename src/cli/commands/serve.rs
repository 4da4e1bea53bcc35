use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Args;

use crate::auth::JwtVerifier;
use crate::config::config;
use crate::database::DatabaseManager;
use crate::routes;
use crate::state::AppState;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let config = config();
    tracing::info!("Starting catalog API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        bail!("SECURITY_JWT_SECRET must be set to serve mutations");
    }
    if crate::is_production!() && config.database.url.is_none() {
        bail!("DATABASE_URL is required in production");
    }

    let stores = DatabaseManager::open(&config.database)
        .await
        .context("failed to open the catalog store")?;
    let verifier = Arc::new(JwtVerifier::from_secret(&config.security.jwt_secret));
    let app = routes::app(AppState::new(stores, verifier));

    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", config.server.host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Catalog API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

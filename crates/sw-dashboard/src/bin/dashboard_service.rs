use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sw_dashboard::{serve, ServiceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServiceConfig::from_env()?;
    let listener = TcpListener::bind(&config.addr).await?;
    info!(
        "Stablewatch dashboard service listening on {} (seed: {:?}, clamp score: {})",
        config.addr, config.seed, config.clamp_score
    );

    serve(listener, Arc::new(config)).await?;
    Ok(())
}

//! API gateway: the HTTP catalog surface over the match and airfare RPCs.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use fanflight::config::GatewayConfig;
use fanflight::gateway::{self, GatewayState};
use fanflight::grpc::{AirfareClient, MatchClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = GatewayConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("fanflight={}", config.log_level).into()),
        )
        .init();

    let addr = config.http.addr();
    info!(http_addr = %addr, "api gateway starting");

    let match_client = MatchClient::connect_lazy(&config.match_client)?;
    let airfare_client = AirfareClient::connect_lazy(&config.airfare_client)?;

    let state = Arc::new(GatewayState {
        match_client,
        airfare: Arc::new(airfare_client),
        catalog_deadline: config.catalog_deadline(),
        default_origin_iata: config.default_origin_iata.clone(),
    });

    let app = gateway::router(state);
    let listener = TcpListener::bind(&addr).await?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
    });

    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
    let _ = shutdown_tx.send(());

    // Drain in-flight requests, but never longer than the configured cap.
    match tokio::time::timeout(config.http.shutdown_timeout(), server).await {
        Ok(joined) => joined??,
        Err(_) => warn!("graceful shutdown timed out"),
    }

    info!("api gateway shutdown complete");
    Ok(())
}

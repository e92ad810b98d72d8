//! Airfare service: gRPC API computing the six-slot price vector for a
//! (match, origin) pair, with a read-through cache in front.

use std::net::SocketAddr;
use std::sync::Arc;

use tonic::transport::Server;
use tracing::{error, info};

use fanflight::cache::{self, AirfareCache};
use fanflight::config::AirfareServiceConfig;
use fanflight::fares::FareClient;
use fanflight::grpc::airfarev1::airfare_service_server::AirfareServiceServer;
use fanflight::grpc::{AirfareGrpcService, GrpcMatchReader, MatchClient, FILE_DESCRIPTOR_SET};
use fanflight::services::AirfareService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = AirfareServiceConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("fanflight={},tonic=info", config.log_level).into()),
        )
        .init();

    info!(grpc_addr = %config.grpc_addr(), "airfare service starting");

    let redis = cache::connect(&config.redis).await.map_err(|err| {
        error!(error = %err, "failed to connect redis");
        err
    })?;
    let airfare_cache = Arc::new(AirfareCache::new(redis));

    let match_client = MatchClient::connect_lazy(&config.match_client)?;
    let match_reader = Arc::new(GrpcMatchReader::new(match_client));

    let fare_client = Arc::new(FareClient::new(&config.fares)?);

    let service = Arc::new(AirfareService::new(
        match_reader,
        fare_client,
        airfare_cache,
        config.airfare_cache_ttl(),
    ));

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_service_status("", tonic_health::ServingStatus::Serving)
        .await;

    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1()?;

    let addr: SocketAddr = config.grpc_addr().parse()?;
    Server::builder()
        .add_service(health_service)
        .add_service(reflection)
        .add_service(AirfareServiceServer::new(AirfareGrpcService::new(service)))
        .serve_with_shutdown(addr, shutdown_signal())
        .await?;

    info!("airfare service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

//! Match ingestion service: gRPC read API over the durable match store plus
//! the periodic upstream sync task.

use std::net::SocketAddr;
use std::sync::Arc;

use tonic::transport::Server;
use tracing::{error, info};

use fanflight::cache::{self, MatchCache};
use fanflight::config::MatchServiceConfig;
use fanflight::database::{create_pool, run_migrations};
use fanflight::football::{FootballClient, FootballSource};
use fanflight::grpc::matchv1::match_service_server::MatchServiceServer;
use fanflight::grpc::{MatchGrpcService, FILE_DESCRIPTOR_SET};
use fanflight::repositories::{CityIataRepository, ClubRepository, MatchRepository};
use fanflight::services::{MatchService, SyncRunner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = MatchServiceConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("fanflight={},sqlx=warn,tonic=info", config.log_level).into()
            }),
        )
        .init();

    info!(grpc_addr = %config.grpc_addr(), "match service starting");

    let pool = create_pool(&config.database).await.map_err(|err| {
        error!(error = %err, "failed to create database pool");
        err
    })?;
    run_migrations(&pool, None).await?;
    info!("database ready");

    let redis = cache::connect(&config.redis).await.map_err(|err| {
        error!(error = %err, "failed to connect redis");
        err
    })?;
    let match_cache = Arc::new(MatchCache::new(redis));

    let football_client = FootballClient::new(&config.football)?;
    let source = FootballSource::new(football_client);

    let service = Arc::new(MatchService::new(
        source,
        CityIataRepository::new(pool.clone()),
        MatchRepository::new(pool.clone()),
        ClubRepository::new(pool.clone()),
        match_cache,
        config.match_cache_ttl(),
    ));

    let sync_handle = if config.sync.enabled {
        let runner = SyncRunner::new(service.clone(), config.sync.clone());
        Some(tokio::spawn(runner.run()))
    } else {
        info!("match sync disabled");
        None
    };

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
        .add_service(MatchServiceServer::new(MatchGrpcService::new(service)))
        .serve_with_shutdown(addr, shutdown_signal())
        .await?;

    if let Some(handle) = sync_handle {
        handle.abort();
    }
    pool.close().await;

    info!("match service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

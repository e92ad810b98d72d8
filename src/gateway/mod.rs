//! HTTP catalog gateway: thin JSON surface over the two RPC services plus
//! the bounded-parallel upcoming-with-airfare aggregate.

pub mod catalog;
pub mod handlers;
pub mod params;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tonic::Status;

use crate::grpc::airfarev1::GetAirfareByMatchResponse;
use crate::grpc::MatchClient;

/// Airfare lookups as the catalog sees them (the airfare service RPC in
/// production, a fake in tests).
#[async_trait]
pub trait AirfareFetch: Send + Sync {
    async fn airfare_by_match(
        &self,
        match_id: i64,
        origin_iata: &str,
    ) -> Result<GetAirfareByMatchResponse, Status>;
}

pub struct GatewayState {
    pub match_client: MatchClient,
    pub airfare: Arc<dyn AirfareFetch>,
    pub catalog_deadline: Duration,
    pub default_origin_iata: String,
}

pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/v1/clubs", get(handlers::get_clubs))
        .route("/v1/matches", get(handlers::get_matches))
        .route("/v1/matches/upcoming", get(handlers::get_upcoming_matches))
        .route(
            "/v1/matches/upcoming-with-airfare",
            get(catalog::get_upcoming_with_airfare),
        )
        .route("/v1/matches/:id", get(handlers::get_match))
        .route("/v1/matches/:id/airfare", get(handlers::get_airfare))
        .layer(middleware::from_fn(handlers::log_requests))
        .with_state(state)
}

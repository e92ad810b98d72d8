use std::time::Duration;

use async_trait::async_trait;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Status};

use crate::config::GrpcClientConfig;
use crate::error::AirfareError;
use crate::grpc::from_proto_timestamp;
use crate::grpc::matchv1::match_service_client::MatchServiceClient;
use crate::grpc::matchv1::{
    GetClubsRequest, GetClubsResponse, GetMatchRequest, GetMatchResponse,
    GetUpcomingMatchesRequest, GetUpcomingMatchesResponse,
};
use crate::models::MatchSnapshot;
use crate::services::MatchReader;

/// Thin client over the match service with a per-call timeout.
#[derive(Clone)]
pub struct MatchClient {
    client: MatchServiceClient<Channel>,
    timeout: Duration,
}

impl MatchClient {
    /// Connects lazily; the channel dials on first use, so the dependent
    /// service can start before the match service is up.
    pub fn connect_lazy(config: &GrpcClientConfig) -> Result<Self, tonic::transport::Error> {
        let channel = Endpoint::from_shared(config.address.clone())?.connect_lazy();

        Ok(Self {
            client: MatchServiceClient::new(channel),
            timeout: config.timeout(),
        })
    }

    pub async fn get_match(&self, match_id: i64) -> Result<GetMatchResponse, Status> {
        let mut client = self.client.clone();
        let call = client.get_match(GetMatchRequest { match_id });

        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(resp)) => Ok(resp.into_inner()),
            Ok(Err(status)) => Err(status),
            Err(_) => Err(Status::deadline_exceeded("match service deadline exceeded")),
        }
    }

    pub async fn get_upcoming_matches(
        &self,
        limit: i32,
        club_id: &str,
    ) -> Result<GetUpcomingMatchesResponse, Status> {
        let mut client = self.client.clone();
        let call = client.get_upcoming_matches(GetUpcomingMatchesRequest {
            limit,
            club_id: club_id.trim().to_string(),
        });

        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(resp)) => Ok(resp.into_inner()),
            Ok(Err(status)) => Err(status),
            Err(_) => Err(Status::deadline_exceeded("match service deadline exceeded")),
        }
    }

    pub async fn get_clubs(&self) -> Result<GetClubsResponse, Status> {
        let mut client = self.client.clone();
        let call = client.get_clubs(GetClubsRequest {});

        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(resp)) => Ok(resp.into_inner()),
            Ok(Err(status)) => Err(status),
            Err(_) => Err(Status::deadline_exceeded("match service deadline exceeded")),
        }
    }
}

/// `MatchReader` backed by the match service RPC, for the airfare service.
pub struct GrpcMatchReader {
    client: MatchClient,
}

impl GrpcMatchReader {
    pub fn new(client: MatchClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MatchReader for GrpcMatchReader {
    async fn get_match(&self, match_id: i64) -> Result<MatchSnapshot, AirfareError> {
        let resp = self
            .client
            .get_match(match_id)
            .await
            .map_err(|status| match status.code() {
                Code::NotFound => AirfareError::MatchNotFound,
                Code::Unavailable => AirfareError::SourceTemporary,
                // Covers the local per-call timeout as well; it surfaces as
                // a deadline_exceeded status.
                Code::DeadlineExceeded => AirfareError::Timeout,
                Code::Cancelled => AirfareError::Canceled,
                _ => AirfareError::Internal(status.message().to_string()),
            })?;

        let m = resp.r#match.ok_or_else(|| {
            AirfareError::Internal("match service returned incomplete payload".to_string())
        })?;
        let kickoff_utc = m
            .kickoff_utc
            .as_ref()
            .and_then(from_proto_timestamp)
            .ok_or_else(|| {
                AirfareError::Internal("match service returned no kickoff".to_string())
            })?;

        Ok(MatchSnapshot {
            match_id: m.match_id,
            kickoff_utc,
            destination_iata: m.destination_airport_iata,
            tickets_link: m.tickets_link,
            home_club_id: m.club_home_id,
            away_club_id: m.club_away_id,
            city: m.city,
            stadium: m.stadium,
        })
    }
}

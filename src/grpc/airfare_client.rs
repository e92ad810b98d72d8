use std::time::Duration;

use async_trait::async_trait;
use tonic::transport::{Channel, Endpoint};
use tonic::Status;

use crate::config::GrpcClientConfig;
use crate::gateway::AirfareFetch;
use crate::grpc::airfarev1::airfare_service_client::AirfareServiceClient;
use crate::grpc::airfarev1::{GetAirfareByMatchRequest, GetAirfareByMatchResponse};

/// Thin client over the airfare service with a per-call timeout.
#[derive(Clone)]
pub struct AirfareClient {
    client: AirfareServiceClient<Channel>,
    timeout: Duration,
}

impl AirfareClient {
    pub fn connect_lazy(config: &GrpcClientConfig) -> Result<Self, tonic::transport::Error> {
        let channel = Endpoint::from_shared(config.address.clone())?.connect_lazy();

        Ok(Self {
            client: AirfareServiceClient::new(channel),
            timeout: config.timeout(),
        })
    }

    pub async fn get_airfare_by_match(
        &self,
        match_id: i64,
        origin_iata: &str,
    ) -> Result<GetAirfareByMatchResponse, Status> {
        let mut client = self.client.clone();
        let call = client.get_airfare_by_match(GetAirfareByMatchRequest {
            match_id,
            origin_iata: origin_iata.to_string(),
        });

        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(resp)) => Ok(resp.into_inner()),
            Ok(Err(status)) => Err(status),
            Err(_) => Err(Status::deadline_exceeded(
                "airfare service deadline exceeded",
            )),
        }
    }
}

#[async_trait]
impl AirfareFetch for AirfareClient {
    async fn airfare_by_match(
        &self,
        match_id: i64,
        origin_iata: &str,
    ) -> Result<GetAirfareByMatchResponse, Status> {
        self.get_airfare_by_match(match_id, origin_iata).await
    }
}

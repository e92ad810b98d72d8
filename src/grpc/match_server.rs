use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::error;

use crate::error::{MatchError, SourceError};
use crate::grpc::matchv1::match_service_server::MatchService as MatchServiceApi;
use crate::grpc::matchv1::{
    self, GetClubsRequest, GetClubsResponse, GetMatchRequest, GetMatchResponse,
    GetUpcomingMatchesRequest, GetUpcomingMatchesResponse,
};
use crate::grpc::to_proto_timestamp;
use crate::models::{Match, MatchId};
use crate::services::MatchService;

/// gRPC surface of the match ingestion service.
pub struct MatchGrpcService {
    service: Arc<MatchService>,
}

impl MatchGrpcService {
    pub fn new(service: Arc<MatchService>) -> Self {
        Self { service }
    }

    fn to_status(err: MatchError) -> Status {
        match err {
            MatchError::NotFound => Status::not_found("match not found"),
            MatchError::InvalidMatchId(_) => Status::invalid_argument("invalid match id"),
            MatchError::Source(SourceError::Unavailable(_)) => {
                Status::unavailable("match source unavailable")
            }
            MatchError::Source(SourceError::Timeout) => {
                Status::deadline_exceeded("deadline exceeded")
            }
            MatchError::Canceled => Status::cancelled("request canceled"),
            err => {
                error!(error = %err, "match request failed");
                Status::internal("internal error")
            }
        }
    }
}

#[tonic::async_trait]
impl MatchServiceApi for MatchGrpcService {
    async fn get_match(
        &self,
        request: Request<GetMatchRequest>,
    ) -> Result<Response<GetMatchResponse>, Status> {
        let req = request.into_inner();
        if req.match_id <= 0 {
            return Err(Status::invalid_argument("match_id must be positive"));
        }

        let id = MatchId::from_numeric(req.match_id);
        let m = self
            .service
            .get_match(&id)
            .await
            .map_err(Self::to_status)?;

        Ok(Response::new(GetMatchResponse {
            r#match: Some(to_proto_match(&m)?),
        }))
    }

    async fn get_upcoming_matches(
        &self,
        request: Request<GetUpcomingMatchesRequest>,
    ) -> Result<Response<GetUpcomingMatchesResponse>, Status> {
        let req = request.into_inner();

        let club_id = req.club_id.trim();
        if !club_id.is_empty() && !club_id.parse::<i64>().map(|id| id > 0).unwrap_or(false) {
            return Err(Status::invalid_argument(
                "club_id must be a positive integer",
            ));
        }

        let matches = self
            .service
            .get_upcoming(i64::from(req.limit), club_id)
            .await
            .map_err(Self::to_status)?;

        let mut resp = GetUpcomingMatchesResponse {
            matches: Vec::with_capacity(matches.len()),
        };
        for m in &matches {
            resp.matches.push(to_proto_match(m)?);
        }

        Ok(Response::new(resp))
    }

    async fn get_clubs(
        &self,
        _request: Request<GetClubsRequest>,
    ) -> Result<Response<GetClubsResponse>, Status> {
        let clubs = self.service.get_clubs().await.map_err(Self::to_status)?;

        Ok(Response::new(GetClubsResponse {
            clubs: clubs
                .into_iter()
                .map(|club| matchv1::Club {
                    club_id: club.id,
                    name_ru: club.name_ru,
                    name_en: club.name_en,
                })
                .collect(),
        }))
    }
}

fn to_proto_match(m: &Match) -> Result<matchv1::Match, Status> {
    let match_id = m.id.numeric().ok_or_else(|| {
        error!(match_id = %m.id, "invalid match id in storage");
        Status::internal("invalid match id in storage")
    })?;

    Ok(matchv1::Match {
        match_id,
        kickoff_utc: Some(to_proto_timestamp(m.kickoff_utc)),
        city: m.city.clone(),
        stadium: m.stadium.clone(),
        destination_airport_iata: m.destination_iata.clone(),
        club_home_id: m.home_club_id.clone(),
        club_away_id: m.away_club_id.clone(),
        tickets_link: m.tickets_link.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn status_mapping_follows_the_error_taxonomy() {
        let cases = [
            (MatchError::NotFound, Code::NotFound),
            (
                MatchError::Source(SourceError::Unavailable("connect refused".to_string())),
                Code::Unavailable,
            ),
            (MatchError::Source(SourceError::Timeout), Code::DeadlineExceeded),
            (MatchError::Canceled, Code::Cancelled),
            (
                MatchError::InvalidMatchId("abc".to_string()),
                Code::InvalidArgument,
            ),
            (
                MatchError::Source(SourceError::Decode("bad payload".to_string())),
                Code::Internal,
            ),
            (MatchError::NothingSynced, Code::Internal),
        ];

        for (err, code) in cases {
            assert_eq!(MatchGrpcService::to_status(err).code(), code);
        }
    }
}

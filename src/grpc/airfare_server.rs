use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::error;

use crate::error::AirfareError;
use crate::grpc::airfarev1::airfare_service_server::AirfareService as AirfareServiceApi;
use crate::grpc::airfarev1::{
    self, FareDirection, FareSlotType, GetAirfareByMatchRequest, GetAirfareByMatchResponse,
};
use crate::models::{Direction, SlotKind};
use crate::services::AirfareService;

/// gRPC surface of the airfare service.
pub struct AirfareGrpcService {
    service: Arc<AirfareService>,
}

impl AirfareGrpcService {
    pub fn new(service: Arc<AirfareService>) -> Self {
        Self { service }
    }

    fn to_status(err: AirfareError) -> Status {
        match err {
            AirfareError::InvalidOrigin => Status::invalid_argument("origin_iata is invalid"),
            AirfareError::InvalidRoute => {
                Status::invalid_argument("origin_iata and destination_iata must differ")
            }
            AirfareError::MatchNotFound => Status::not_found("match not found"),
            AirfareError::SourceTemporary => {
                Status::unavailable("source temporarily unavailable")
            }
            AirfareError::Timeout => Status::deadline_exceeded("deadline exceeded"),
            AirfareError::Canceled => Status::cancelled("request canceled"),
            AirfareError::Internal(message) => {
                error!(error = %message, "airfare request failed");
                Status::internal("internal error")
            }
        }
    }
}

#[tonic::async_trait]
impl AirfareServiceApi for AirfareGrpcService {
    async fn get_airfare_by_match(
        &self,
        request: Request<GetAirfareByMatchRequest>,
    ) -> Result<Response<GetAirfareByMatchResponse>, Status> {
        let req = request.into_inner();
        if req.match_id <= 0 {
            return Err(Status::invalid_argument("match_id must be positive"));
        }
        if req.origin_iata.trim().is_empty() {
            return Err(Status::invalid_argument("origin_iata is required"));
        }

        let result = self
            .service
            .get_airfare_by_match(req.match_id, &req.origin_iata)
            .await
            .map_err(Self::to_status)?;

        let slots = result
            .slots
            .iter()
            .map(|slot| airfarev1::FareSlot {
                slot: slot_kind_to_proto(slot.kind) as i32,
                direction: direction_to_proto(slot.direction) as i32,
                date: slot.date_utc.format("%Y-%m-%d").to_string(),
                prices: slot.prices.clone(),
            })
            .collect();

        Ok(Response::new(GetAirfareByMatchResponse {
            match_id: result.match_id,
            tickets_link: result.tickets_link,
            slots,
        }))
    }
}

fn slot_kind_to_proto(kind: SlotKind) -> FareSlotType {
    match kind {
        SlotKind::OutDMinus2 => FareSlotType::FareSlotOutDMinus2,
        SlotKind::OutDMinus1 => FareSlotType::FareSlotOutDMinus1,
        SlotKind::OutD0ArriveBy => FareSlotType::FareSlotOutD0ArriveBy,
        SlotKind::RetD0DepartAfter => FareSlotType::FareSlotRetD0DepartAfter,
        SlotKind::RetDPlus1 => FareSlotType::FareSlotRetDPlus1,
        SlotKind::RetDPlus2 => FareSlotType::FareSlotRetDPlus2,
    }
}

fn direction_to_proto(direction: Direction) -> FareDirection {
    match direction {
        Direction::Out => FareDirection::Outbound,
        Direction::Ret => FareDirection::Return,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn status_mapping_follows_the_error_taxonomy() {
        let cases = [
            (AirfareError::InvalidOrigin, Code::InvalidArgument),
            (AirfareError::InvalidRoute, Code::InvalidArgument),
            (AirfareError::MatchNotFound, Code::NotFound),
            (AirfareError::SourceTemporary, Code::Unavailable),
            (AirfareError::Timeout, Code::DeadlineExceeded),
            (AirfareError::Canceled, Code::Cancelled),
            (AirfareError::Internal("boom".to_string()), Code::Internal),
        ];

        for (err, code) in cases {
            assert_eq!(AirfareGrpcService::to_status(err).code(), code);
        }
    }
}

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::SecondsFormat;
use serde::Serialize;
use serde_json::json;
use tonic::{Code, Status};
use tracing::{error, info};

use crate::gateway::{params, GatewayState};
use crate::grpc::airfarev1::{FareDirection, FareSlotType, GetAirfareByMatchResponse};
use crate::grpc::{from_proto_timestamp, matchv1};

const DEFAULT_UPCOMING_LIMIT: i32 = 12;
const MAX_UPCOMING_LIMIT: i32 = 100;

/// JSON error body with the HTTP status mapped from the upstream RPC code.
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn from_status(status: &Status) -> Self {
        let message = if status.message().is_empty() {
            "upstream error".to_string()
        } else {
            status.message().to_string()
        };

        Self {
            status: http_status(status.code()),
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

fn http_status(code: Code) -> StatusCode {
    match code {
        Code::InvalidArgument => StatusCode::BAD_REQUEST,
        Code::NotFound => StatusCode::NOT_FOUND,
        Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub match_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kickoff_utc: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub city: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stadium: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub destination_airport_iata: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub club_home_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub club_away_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tickets_link: String,
}

impl From<&matchv1::Match> for MatchResponse {
    fn from(m: &matchv1::Match) -> Self {
        Self {
            match_id: m.match_id.to_string(),
            kickoff_utc: m
                .kickoff_utc
                .as_ref()
                .and_then(from_proto_timestamp)
                .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            city: m.city.clone(),
            stadium: m.stadium.clone(),
            destination_airport_iata: m.destination_airport_iata.clone(),
            club_home_id: m.club_home_id.clone(),
            club_away_id: m.club_away_id.clone(),
            tickets_link: m.tickets_link.clone(),
        }
    }
}

#[derive(Serialize)]
struct MatchLoadError {
    match_id: i64,
    error: String,
}

#[derive(Serialize)]
struct FareSlotResponse {
    slot: String,
    direction: String,
    date: String,
    prices: Vec<i64>,
}

#[derive(Serialize)]
pub struct AirfareResponse {
    match_id: String,
    tickets_link: String,
    slots: Vec<FareSlotResponse>,
}

impl From<GetAirfareByMatchResponse> for AirfareResponse {
    fn from(resp: GetAirfareByMatchResponse) -> Self {
        Self {
            match_id: resp.match_id.to_string(),
            tickets_link: resp.tickets_link,
            slots: resp
                .slots
                .into_iter()
                .map(|slot| FareSlotResponse {
                    slot: slot_name(slot.slot),
                    direction: direction_name(slot.direction),
                    date: slot.date,
                    prices: slot.prices,
                })
                .collect(),
        }
    }
}

pub(crate) fn slot_name(raw: i32) -> String {
    FareSlotType::try_from(raw)
        .unwrap_or(FareSlotType::FareSlotUnspecified)
        .as_str_name()
        .to_string()
}

fn direction_name(raw: i32) -> String {
    FareDirection::try_from(raw)
        .unwrap_or(FareDirection::Unspecified)
        .as_str_name()
        .to_string()
}

pub async fn healthz() -> &'static str {
    "ok"
}

/// GET /v1/matches/{id}
pub async fn get_match(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<String>,
) -> Result<Json<MatchResponse>, ApiError> {
    let match_id =
        params::parse_positive_int(&id).ok_or_else(|| ApiError::bad_request("invalid match_id"))?;

    let resp = state.match_client.get_match(match_id).await.map_err(|status| {
        error!(match_id, error = %status, "get match failed");
        ApiError::from_status(&status)
    })?;

    let m = resp
        .r#match
        .ok_or_else(|| ApiError::from_status(&Status::internal("empty match payload")))?;

    Ok(Json(MatchResponse::from(&m)))
}

/// GET /v1/matches?ids=1,2,3 — serial per-id fan-out; per-id failures are
/// collected and only an all-failed batch is a gateway error.
pub async fn get_matches(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let Some(ids) = query.get("ids").and_then(|raw| params::parse_match_ids(raw)) else {
        return ApiError::bad_request(
            "ids query is required, example: /v1/matches?ids=16114,16115",
        )
        .into_response();
    };

    let mut matches = Vec::with_capacity(ids.len());
    let mut errors = Vec::new();

    for id in ids {
        match state.match_client.get_match(id).await {
            Ok(resp) => {
                if let Some(m) = resp.r#match {
                    matches.push(MatchResponse::from(&m));
                }
            }
            Err(status) => {
                error!(match_id = id, error = %status, "get match failed in list");
                errors.push(MatchLoadError {
                    match_id: id,
                    error: ApiError::from_status(&status).message,
                });
            }
        }
    }

    if matches.is_empty() {
        return (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": "match service error", "errors": errors })),
        )
            .into_response();
    }

    Json(json!({ "matches": matches, "errors": errors })).into_response()
}

/// GET /v1/matches/upcoming?limit=
pub async fn get_upcoming_matches(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let limit = params::parse_limit(
        query.get("limit").map(String::as_str),
        DEFAULT_UPCOMING_LIMIT,
        MAX_UPCOMING_LIMIT,
    )
    .map_err(ApiError::bad_request)?;

    let resp = state
        .match_client
        .get_upcoming_matches(limit, "")
        .await
        .map_err(|status| {
            error!(limit, error = %status, "get upcoming matches failed");
            ApiError::from_status(&status)
        })?;

    let matches: Vec<MatchResponse> = resp.matches.iter().map(MatchResponse::from).collect();

    Ok(Json(json!({ "matches": matches, "errors": [] })).into_response())
}

/// GET /v1/matches/{id}/airfare?origin_iata=XXX — proxy to the airfare RPC.
pub async fn get_airfare(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<AirfareResponse>, ApiError> {
    let match_id =
        params::parse_positive_int(&id).ok_or_else(|| ApiError::bad_request("invalid match_id"))?;

    let origin = query
        .get("origin_iata")
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("origin_iata is required"))?;

    let resp = state
        .airfare
        .airfare_by_match(match_id, &origin)
        .await
        .map_err(|status| ApiError::from_status(&status))?;

    Ok(Json(AirfareResponse::from(resp)))
}

/// GET /v1/clubs
pub async fn get_clubs(
    State(state): State<Arc<GatewayState>>,
) -> Result<Response, ApiError> {
    let resp = state.match_client.get_clubs().await.map_err(|status| {
        error!(error = %status, "get clubs failed");
        ApiError::from_status(&status)
    })?;

    let clubs: Vec<serde_json::Value> = resp
        .clubs
        .iter()
        .map(|club| {
            json!({
                "club_id": club.club_id.trim(),
                "name_ru": club.name_ru.trim(),
                "name_en": club.name_en.trim(),
            })
        })
        .collect();

    Ok(Json(json!({ "clubs": clubs })).into_response())
}

pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        %method,
        path,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "http request"
    );

    response
}

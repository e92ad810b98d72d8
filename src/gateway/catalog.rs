use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::future::join_all;
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::error;

use crate::gateway::handlers::{slot_name, ApiError, MatchResponse};
use crate::gateway::{params, AirfareFetch, GatewayState};
use crate::grpc::airfarev1::{FareDirection, FareSlot};
use crate::grpc::matchv1;

const DEFAULT_LIMIT: i32 = 12;
const MAX_LIMIT: i32 = 30;
/// Over-fetch size when a club filter is applied; upstream cannot filter
/// cheaply, so we post-filter a larger page.
const CLUB_OVERFETCH_LIMIT: i32 = 100;
const MAX_CONCURRENT_AIRFARE_CALLS: usize = 4;

const ROUTE_CONFLICT_ERROR: &str = "origin_iata and destination_iata must differ";
const NO_OFFERS_ERROR: &str = "no airfare offers found";

#[derive(Debug, Serialize)]
pub struct CatalogItem {
    #[serde(rename = "match")]
    pub match_info: MatchResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_slot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_outbound_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_return_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_return_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_trip_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airfare_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CatalogLoadError {
    pub match_id: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub origin_iata: String,
    pub items: Vec<CatalogItem>,
    pub errors: Vec<CatalogLoadError>,
}

/// GET /v1/matches/upcoming-with-airfare?limit=&origin_iata=&club_id=
pub async fn get_upcoming_with_airfare(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let limit = params::parse_limit(query.get("limit").map(String::as_str), DEFAULT_LIMIT, MAX_LIMIT)
        .map_err(ApiError::bad_request)?;

    let origin = params::resolve_origin(
        query.get("origin_iata").map(String::as_str),
        &state.default_origin_iata,
    )
    .map_err(ApiError::bad_request)?;

    let club_id = match query.get("club_id").map(|s| s.trim()).filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => Some(
            params::parse_positive_int(raw)
                .ok_or_else(|| ApiError::bad_request("club_id must be a positive integer"))?
                .to_string(),
        ),
    };

    // Club filtering happens here, not upstream: fetch a larger page and
    // post-filter by home/away equality.
    let upstream_limit = if club_id.is_some() {
        CLUB_OVERFETCH_LIMIT.max(limit)
    } else {
        limit
    };

    let deadline = state.catalog_deadline;
    let listing = tokio::time::timeout(
        deadline,
        state.match_client.get_upcoming_matches(upstream_limit, ""),
    )
    .await;

    let matches = match listing {
        Ok(Ok(resp)) => resp.matches,
        Ok(Err(status)) => {
            error!(limit, error = %status, "get upcoming matches failed");
            return Err(ApiError {
                status: axum::http::StatusCode::BAD_GATEWAY,
                message: "match service error".to_string(),
            });
        }
        Err(_) => {
            return Err(ApiError {
                status: axum::http::StatusCode::BAD_GATEWAY,
                message: "match service error".to_string(),
            });
        }
    };

    let matches = match &club_id {
        Some(club_id) => truncate(filter_matches_by_club(matches, club_id), limit),
        None => truncate(matches, limit),
    };

    let response = aggregate(state.airfare.clone(), matches, &origin, deadline).await;
    Ok(Json(response).into_response())
}

/// Keep matches where the club plays home or away.
pub fn filter_matches_by_club(matches: Vec<matchv1::Match>, club_id: &str) -> Vec<matchv1::Match> {
    let club_id = club_id.trim();
    if club_id.is_empty() {
        return matches;
    }

    matches
        .into_iter()
        .filter(|m| m.club_home_id.trim() == club_id || m.club_away_id.trim() == club_id)
        .collect()
}

fn truncate(mut matches: Vec<matchv1::Match>, limit: i32) -> Vec<matchv1::Match> {
    if limit > 0 {
        matches.truncate(limit as usize);
    }
    matches
}

/// Fan out one airfare call per match under a counting semaphore, each
/// bounded by what remains of the request deadline. Results land in the
/// item slot matching the upstream listing order; failures become per-item
/// errors and never fail the aggregate.
pub async fn aggregate(
    airfare: Arc<dyn AirfareFetch>,
    matches: Vec<matchv1::Match>,
    origin_iata: &str,
    deadline: Duration,
) -> CatalogResponse {
    let started = Instant::now();

    let mut items: Vec<CatalogItem> = matches
        .iter()
        .map(|m| CatalogItem {
            match_info: MatchResponse::from(m),
            min_price: None,
            best_slot: None,
            best_date: None,
            best_outbound_price: None,
            best_return_price: None,
            best_return_date: None,
            round_trip_price: None,
            airfare_error: None,
        })
        .collect();

    let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_AIRFARE_CALLS));
    let mut handles = Vec::new();

    for (idx, m) in matches.iter().enumerate() {
        if m.destination_airport_iata.trim().eq_ignore_ascii_case(origin_iata) {
            items[idx].airfare_error = Some(ROUTE_CONFLICT_ERROR.to_string());
            continue;
        }

        let airfare = airfare.clone();
        let semaphore = semaphore.clone();
        let origin = origin_iata.to_string();
        let match_id = m.match_id;

        handles.push(tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return (idx, Err("request canceled".to_string()));
            };

            let remaining = deadline.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                return (idx, Err("deadline exceeded".to_string()));
            }

            match tokio::time::timeout(remaining, airfare.airfare_by_match(match_id, &origin)).await
            {
                Ok(Ok(resp)) => (idx, Ok(resp)),
                Ok(Err(status)) => {
                    let message = if status.message().is_empty() {
                        "upstream error".to_string()
                    } else {
                        status.message().to_string()
                    };
                    (idx, Err(message))
                }
                Err(_) => (idx, Err("deadline exceeded".to_string())),
            }
        }));
    }

    for joined in join_all(handles).await {
        let Ok((idx, outcome)) = joined else {
            continue;
        };

        match outcome {
            Ok(resp) => match summarize_slots(&resp.slots) {
                Some(summary) => {
                    let item = &mut items[idx];
                    item.min_price = Some(summary.min_price);
                    item.best_slot = Some(summary.best_slot);
                    item.best_date = Some(summary.best_date);
                    item.best_outbound_price = summary.best_outbound_price;
                    item.best_return_price = summary.best_return_price;
                    item.best_return_date = summary.best_return_date;
                    item.round_trip_price = summary.round_trip_price;
                }
                None => items[idx].airfare_error = Some(NO_OFFERS_ERROR.to_string()),
            },
            Err(message) => items[idx].airfare_error = Some(message),
        }
    }

    let errors = items
        .iter()
        .filter_map(|item| {
            item.airfare_error.as_ref().map(|error| CatalogLoadError {
                match_id: item.match_info.match_id.clone(),
                error: error.clone(),
            })
        })
        .collect();

    CatalogResponse {
        origin_iata: origin_iata.to_string(),
        items,
        errors,
    }
}

#[derive(Debug, PartialEq)]
pub struct FareSummary {
    pub min_price: i64,
    pub best_slot: String,
    pub best_date: String,
    pub best_outbound_price: Option<i64>,
    pub best_return_price: Option<i64>,
    pub best_return_date: Option<String>,
    pub round_trip_price: Option<i64>,
}

/// Per-match price summary: the overall minimum with its slot and date, the
/// cheapest leg per direction, and their sum as a round-trip estimate.
/// `None` when no slot carries any price.
pub fn summarize_slots(slots: &[FareSlot]) -> Option<FareSummary> {
    let mut min_price: Option<(i64, String, String)> = None;
    let mut best_outbound: Option<i64> = None;
    let mut best_return: Option<(i64, String)> = None;

    for slot in slots {
        let direction =
            FareDirection::try_from(slot.direction).unwrap_or(FareDirection::Unspecified);

        for &price in &slot.prices {
            if min_price.as_ref().map(|(best, _, _)| price < *best).unwrap_or(true) {
                min_price = Some((price, slot_name(slot.slot), slot.date.clone()));
            }

            match direction {
                FareDirection::Outbound => {
                    if best_outbound.map(|best| price < best).unwrap_or(true) {
                        best_outbound = Some(price);
                    }
                }
                FareDirection::Return => {
                    if best_return.as_ref().map(|(best, _)| price < *best).unwrap_or(true) {
                        best_return = Some((price, slot.date.clone()));
                    }
                }
                FareDirection::Unspecified => {}
            }
        }
    }

    let (min_price, best_slot, best_date) = min_price?;
    let best_return_price = best_return.as_ref().map(|(price, _)| *price);
    let best_return_date = best_return.map(|(_, date)| date);
    let round_trip_price = match (best_outbound, best_return_price) {
        (Some(out), Some(ret)) => Some(out + ret),
        _ => None,
    };

    Some(FareSummary {
        min_price,
        best_slot,
        best_date,
        best_outbound_price: best_outbound,
        best_return_price,
        best_return_date,
        round_trip_price,
    })
}

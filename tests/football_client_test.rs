use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fanflight::error::SourceError;
use fanflight::football::FootballClient;

fn client(server: &MockServer, max_attempts: u32) -> FootballClient {
    FootballClient::with_http(
        &server.uri(),
        reqwest::Client::new(),
        max_attempts,
        Duration::from_millis(1),
    )
}

fn full_match_body() -> serde_json::Value {
    json!({
        "id": 16114,
        "tournament": 42,
        "stage": 18,
        "date": "2026-02-27 19:30:00",
        "city": "Санкт-Петербург",
        "ticketsLink": "https://tickets.example/16114",
        "stadium": "Gazprom Arena",
        "clubH": 5,
        "clubA": 7
    })
}

#[tokio::test]
async fn transient_errors_are_retried_until_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/getFullDataMatch"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/getFullDataMatch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(full_match_body()))
        .expect(1)
        .mount(&server)
        .await;

    let payload = client(&server, 3).get_full_data_match(16114).await.unwrap();
    assert_eq!(payload.id, 16114);
    assert_eq!(payload.club_away, Some(7));
}

#[tokio::test]
async fn retry_budget_exhaustion_surfaces_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/getFullDataMatch"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let err = client(&server, 2).get_full_data_match(16114).await.unwrap_err();
    assert!(matches!(err, SourceError::Unavailable(_)));
}

#[tokio::test]
async fn http_429_is_transient() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/getFullDataMatch"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/getFullDataMatch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(full_match_body()))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server, 3).get_full_data_match(16114).await.is_ok());
}

#[tokio::test]
async fn match_404_maps_to_not_found_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/getFullDataMatch"))
        .and(body_json(json!({"id": 99999})))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, 3).get_full_data_match(99999).await.unwrap_err();
    assert!(matches!(err, SourceError::NotFound));
}

#[tokio::test]
async fn tournaments_404_is_transient_not_missing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/getTournaments"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let err = client(&server, 2).get_tournaments().await.unwrap_err();
    assert!(matches!(err, SourceError::Unavailable(_)));
}

#[tokio::test]
async fn permanent_4xx_fails_on_first_attempt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/getFullDataMatch"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, 3).get_full_data_match(16114).await.unwrap_err();
    match err {
        SourceError::Status { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "bad request");
        }
        other => panic!("expected permanent status error, got {:?}", other),
    }
}

#[tokio::test]
async fn tournaments_request_carries_type_and_decodes_wrapped_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/getTournaments"))
        .and(body_json(json!({"type": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                {"id": 42, "name": "Season 25/26", "archive": false,
                 "dateFrom": "2025-07-15", "dateTo": "2026-05-24"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tournaments = client(&server, 1).get_tournaments().await.unwrap();
    assert_eq!(tournaments.len(), 1);
    assert_eq!(tournaments[0].id, 42);
}

#[tokio::test]
async fn matches_listing_decodes_stages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/getMatches"))
        .and(body_json(json!({"tournament": 42})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"stage": 18, "matches": [
                {"id": 16114, "date": "2026-02-27 19:30:00"},
                {"id": 16115, "date": "2026-02-28UTC16:00:00"}
            ]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let stages = client(&server, 1).get_matches(42).await.unwrap();
    assert_eq!(stages.len(), 1);
    assert_eq!(stages[0].matches.len(), 2);
    assert_eq!(stages[0].matches[1].id, 16115);
}

#[tokio::test]
async fn malformed_success_payload_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/getFullDataMatch"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, 3).get_full_data_match(16114).await.unwrap_err();
    assert!(matches!(err, SourceError::Decode(_)));
}

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SourceError;

#[derive(Debug, Clone, Serialize)]
pub struct GetTournamentsRequest {
    #[serde(rename = "type")]
    pub kind: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetMatchesRequest {
    pub tournament: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetFullDataMatchRequest {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tournament {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub archive: bool,
    #[serde(default, rename = "dateFrom")]
    pub date_from: String,
    #[serde(default, rename = "dateTo")]
    pub date_to: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StageMatches {
    #[serde(default)]
    pub stage: i64,
    #[serde(default)]
    pub matches: Vec<MatchListItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchListItem {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FullDataMatch {
    pub id: i64,
    #[serde(default)]
    pub tournament: i64,
    #[serde(default)]
    pub stage: i64,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub city: String,
    #[serde(default, rename = "ticketsLink")]
    pub tickets_link: String,
    #[serde(default)]
    pub stadium: String,
    #[serde(rename = "clubH")]
    pub club_home: Option<i64>,
    #[serde(rename = "clubA")]
    pub club_away: Option<i64>,
}

/// Decode the tournaments payload, which upstream wraps inconsistently:
/// either a bare array or an object keyed by one of several wrapper names.
pub fn decode_tournaments(raw: Value) -> Result<Vec<Tournament>, SourceError> {
    decode_wrapped_list(raw, &["tournaments", "data", "result", "items"])
        .ok_or_else(|| SourceError::Decode("unsupported tournaments payload shape".to_string()))
}

/// Variant-tolerant list decoding: bare array first, then known wrapper keys
/// in order, first non-empty list wins. `None` when no variant matches.
fn decode_wrapped_list<T: DeserializeOwned>(raw: Value, keys: &[&str]) -> Option<Vec<T>> {
    if raw.is_null() {
        return Some(Vec::new());
    }

    if let Ok(list) = serde_json::from_value::<Vec<T>>(raw.clone()) {
        return Some(list);
    }

    if let Value::Object(map) = raw {
        for key in keys {
            if let Some(candidate) = map.get(*key) {
                if let Ok(list) = serde_json::from_value::<Vec<T>>(candidate.clone()) {
                    if !list.is_empty() {
                        return Some(list);
                    }
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tournament_payload() -> Value {
        json!([
            {"id": 42, "name": "Season 25/26", "archive": false, "dateFrom": "2025-07-15", "dateTo": "2026-05-24"},
            {"id": 41, "name": "Season 24/25", "archive": true, "dateFrom": "2024-07-13", "dateTo": "2025-05-25"}
        ])
    }

    #[test]
    fn decodes_bare_array() {
        let tournaments = decode_tournaments(tournament_payload()).unwrap();
        assert_eq!(tournaments.len(), 2);
        assert_eq!(tournaments[0].id, 42);
        assert_eq!(tournaments[0].date_from, "2025-07-15");
    }

    #[test]
    fn decodes_every_known_wrapper_key() {
        for key in ["tournaments", "data", "result", "items"] {
            let wrapped = json!({ key: tournament_payload() });
            let tournaments = decode_tournaments(wrapped).unwrap();
            assert_eq!(tournaments.len(), 2, "wrapper key {}", key);
        }
    }

    #[test]
    fn null_payload_is_an_empty_list() {
        assert!(decode_tournaments(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn unknown_shape_is_a_hard_failure() {
        let err = decode_tournaments(json!({"rows": [{"id": 1}]})).unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }

    #[test]
    fn wrapper_with_empty_list_is_a_hard_failure() {
        let err = decode_tournaments(json!({"data": []})).unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }

    #[test]
    fn full_data_match_tolerates_null_clubs() {
        let m: FullDataMatch = serde_json::from_value(json!({
            "id": 16114,
            "date": "2026-02-27 19:30:00",
            "city": "Москва",
            "ticketsLink": "https://tickets.example/16114",
            "stadium": "VTB Arena",
            "clubH": 5,
            "clubA": null
        }))
        .unwrap();
        assert_eq!(m.club_home, Some(5));
        assert_eq!(m.club_away, None);
    }
}

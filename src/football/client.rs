use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::FootballConfig;
use crate::error::SourceError;
use crate::football::dto;

const FULL_DATA_MATCH_PATH: &str = "/api/getFullDataMatch";
const TOURNAMENTS_PATH: &str = "/api/getTournaments";
const MATCHES_PATH: &str = "/api/getMatches";

const MAX_ERROR_BODY_BYTES: usize = 4096;

/// HTTP client for the football API.
///
/// All endpoints are POST with a JSON body. Transient failures (network,
/// 5xx, 429) are retried with exponential backoff; everything else surfaces
/// on the first attempt.
pub struct FootballClient {
    base_url: String,
    http: reqwest::Client,
    max_attempts: u32,
    base_backoff: Duration,
}

impl FootballClient {
    pub fn new(config: &FootballConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self::with_http(
            &config.base_url,
            http,
            config.retry_max_attempts,
            config.retry_base_interval(),
        ))
    }

    pub fn with_http(
        base_url: &str,
        http: reqwest::Client,
        max_attempts: u32,
        base_backoff: Duration,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            max_attempts: max_attempts.max(1),
            base_backoff: if base_backoff.is_zero() {
                Duration::from_millis(100)
            } else {
                base_backoff
            },
        }
    }

    /// Per-match detail. A 404 here means the match does not exist.
    pub async fn get_full_data_match(&self, id: i64) -> Result<dto::FullDataMatch, SourceError> {
        self.post_with_retry(
            FULL_DATA_MATCH_PATH,
            &dto::GetFullDataMatchRequest { id },
            true,
        )
        .await
    }

    pub async fn get_tournaments(&self) -> Result<Vec<dto::Tournament>, SourceError> {
        let raw: Value = self
            .post_with_retry(TOURNAMENTS_PATH, &dto::GetTournamentsRequest { kind: 1 }, false)
            .await?;

        dto::decode_tournaments(raw)
    }

    pub async fn get_matches(&self, tournament: i64) -> Result<Vec<dto::StageMatches>, SourceError> {
        self.post_with_retry(
            MATCHES_PATH,
            &dto::GetMatchesRequest {
                tournament,
                stage: None,
            },
            false,
        )
        .await
    }

    async fn post_with_retry<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        not_found_as_missing: bool,
    ) -> Result<T, SourceError> {
        let mut last_err = None;

        for attempt in 1..=self.max_attempts {
            match self.post_once(path, body, not_found_as_missing).await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    let retryable = matches!(err, SourceError::Unavailable(_));
                    last_err = Some(err);

                    if !retryable || attempt == self.max_attempts {
                        break;
                    }

                    let backoff = self.base_backoff * 2u32.pow(attempt - 1);
                    tokio::time::sleep(backoff).await;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| SourceError::Unavailable("no attempt made".to_string())))
    }

    async fn post_once<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        not_found_as_missing: bool,
    ) -> Result<T, SourceError> {
        let url = format!("{}{}", self.base_url, path);

        let response = match self.http.post(&url).json(body).send().await {
            Ok(response) => response,
            Err(err) if err.is_timeout() => return Err(SourceError::Timeout),
            Err(err) => return Err(SourceError::Unavailable(err.to_string())),
        };

        let status = response.status();
        if !status.is_success() {
            let body = read_body_capped(response).await;

            if status == reqwest::StatusCode::NOT_FOUND {
                if not_found_as_missing {
                    return Err(SourceError::NotFound);
                }
                return Err(SourceError::Unavailable(format!("status 404: {}", body)));
            }

            if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(SourceError::Unavailable(format!(
                    "status {}: {}",
                    status.as_u16(),
                    body
                )));
            }

            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        match response.json::<T>().await {
            Ok(value) => Ok(value),
            Err(err) if err.is_timeout() => Err(SourceError::Timeout),
            Err(err) => Err(SourceError::Decode(err.to_string())),
        }
    }
}

async fn read_body_capped(response: reqwest::Response) -> String {
    let Ok(bytes) = response.bytes().await else {
        return String::new();
    };

    let capped = &bytes[..bytes.len().min(MAX_ERROR_BODY_BYTES)];
    String::from_utf8_lossy(capped).trim().to_string()
}

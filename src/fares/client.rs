use async_trait::async_trait;

use crate::config::FareSourceConfig;
use crate::error::FareError;
use crate::fares::dto::PricesForDatesResponse;
use crate::fares::filter;
use crate::fares::FareSource;
use crate::models::FareSearch;

const PRICES_FOR_DATES_PATH: &str = "/aviasales/v3/prices_for_dates";

/// HTTP client for the travel prices API.
pub struct FareClient {
    base_url: String,
    token: String,
    currency: String,
    limit: u32,
    http: reqwest::Client,
}

impl FareClient {
    pub fn new(config: &FareSourceConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self::with_http(config, http))
    }

    pub fn with_http(config: &FareSourceConfig, http: reqwest::Client) -> Self {
        let base_url = config.base_url.trim().trim_end_matches('/');
        let currency = config.currency.trim().to_lowercase();

        Self {
            base_url: if base_url.is_empty() {
                "https://api.travelpayouts.com".to_string()
            } else {
                base_url.to_string()
            },
            token: config.token.trim().to_string(),
            currency: if currency.is_empty() {
                "rub".to_string()
            } else {
                currency
            },
            limit: if config.limit == 0 { 30 } else { config.limit },
            http,
        }
    }
}

#[async_trait]
impl FareSource for FareClient {
    async fn prices(&self, search: &FareSearch) -> Result<Vec<i64>, FareError> {
        if self.token.is_empty() {
            return Err(FareError::MissingToken);
        }

        let url = format!("{}{}", self.base_url, PRICES_FOR_DATES_PATH);
        let departure_at = search.date_utc.format("%Y-%m-%d").to_string();

        let query = [
            ("origin", search.origin_iata.trim().to_uppercase()),
            ("destination", search.destination_iata.trim().to_uppercase()),
            ("departure_at", departure_at),
            ("currency", self.currency.clone()),
            ("sorting", "price".to_string()),
            ("token", self.token.clone()),
            ("limit", self.limit.to_string()),
            ("one_way", "true".to_string()),
        ];

        let response = self.http.get(&url).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FareError::Status(status.as_u16()));
        }

        let payload: PricesForDatesResponse = response
            .json()
            .await
            .map_err(|err| FareError::Decode(err.to_string()))?;

        Ok(filter::extract_prices(&payload.data, search))
    }
}

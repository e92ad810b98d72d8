use serde::Deserialize;

/// One offer from `prices_for_dates`. Fields arrive partially populated;
/// missing strings decode as empty and missing durations as zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PriceOffer {
    pub price: i64,
    pub departure_at: String,
    pub return_at: String,
    /// Outbound leg duration, minutes.
    pub duration_to: i64,
    /// Total itinerary duration, minutes.
    pub duration: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PricesForDatesResponse {
    pub data: Vec<PriceOffer>,
}

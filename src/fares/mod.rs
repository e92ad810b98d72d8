//! Fare source adapter: cheapest one-way prices for a day, filtered by the
//! slot's time-of-day bound.

pub mod client;
pub mod dto;
pub mod filter;

pub use client::FareClient;

use async_trait::async_trait;

use crate::error::FareError;
use crate::models::FareSearch;

/// One fare query per slot. Implementations return prices already filtered,
/// sorted ascending and deduplicated; empty when nothing matched.
#[async_trait]
pub trait FareSource: Send + Sync {
    async fn prices(&self, search: &FareSearch) -> Result<Vec<i64>, FareError>;
}

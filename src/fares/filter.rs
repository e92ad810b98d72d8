use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::fares::dto::PriceOffer;
use crate::models::FareSearch;

/// Filter offers by the search's time bound, then sort prices ascending and
/// collapse duplicates. Always returns a list, possibly empty.
pub fn extract_prices(offers: &[PriceOffer], search: &FareSearch) -> Vec<i64> {
    let mut prices: Vec<i64> = offers
        .iter()
        .filter(|offer| offer.price > 0)
        .filter(|offer| passes_time_constraints(offer, search))
        .map(|offer| offer.price)
        .collect();

    prices.sort_unstable();
    prices.dedup();
    prices
}

fn passes_time_constraints(offer: &PriceOffer, search: &FareSearch) -> bool {
    if search.arrive_not_later_utc.is_none() && search.depart_not_before_utc.is_none() {
        return true;
    }

    let departure = parse_offer_time(&offer.departure_at);
    let return_at = parse_offer_time(&offer.return_at);

    // Arrival is reconstructed from departure plus the longest known leg
    // duration; without a positive duration the arrival stays unknown.
    let arrival = departure.and_then(|dep| {
        let minutes = offer.duration_to.max(offer.duration);
        (minutes > 0).then(|| dep + Duration::minutes(minutes))
    });

    if let Some(bound) = search.arrive_not_later_utc {
        match arrival {
            None => return false,
            Some(arrival) if arrival > bound => return false,
            Some(_) => {}
        }
    }

    if let Some(bound) = search.depart_not_before_utc {
        match departure.or(return_at) {
            None => return false,
            Some(instant) if instant < bound => return false,
            Some(_) => {}
        }
    }

    true
}

fn parse_offer_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for layout in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, layout) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|day| day.and_time(NaiveTime::MIN).and_utc())
}

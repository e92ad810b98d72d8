use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Days, Duration, NaiveTime, Utc};
use tracing::{debug, info, warn};

use crate::cache::AirfareCacheStore;
use crate::error::AirfareError;
use crate::fares::FareSource;
use crate::models::{AirfareByMatch, Direction, FareSearch, FareSlot, MatchSnapshot, SlotKind};

/// Source of match snapshots for the airfare service (the match service RPC
/// in production, a fake in tests).
#[async_trait]
pub trait MatchReader: Send + Sync {
    async fn get_match(&self, match_id: i64) -> Result<MatchSnapshot, AirfareError>;
}

/// The slot engine: derives six time-shaped searches from a kickoff, fans
/// out to the fare source one slot at a time, and caches the assembled
/// result.
pub struct AirfareService {
    match_reader: Arc<dyn MatchReader>,
    fare_source: Arc<dyn FareSource>,
    cache: Arc<dyn AirfareCacheStore>,
    cache_ttl: StdDuration,
}

impl AirfareService {
    pub fn new(
        match_reader: Arc<dyn MatchReader>,
        fare_source: Arc<dyn FareSource>,
        cache: Arc<dyn AirfareCacheStore>,
        cache_ttl: StdDuration,
    ) -> Self {
        Self {
            match_reader,
            fare_source,
            cache,
            cache_ttl,
        }
    }

    pub async fn get_airfare_by_match(
        &self,
        match_id: i64,
        origin_iata: &str,
    ) -> Result<AirfareByMatch, AirfareError> {
        if match_id <= 0 {
            return Err(AirfareError::MatchNotFound);
        }
        if origin_iata.trim().is_empty() {
            return Err(AirfareError::InvalidOrigin);
        }

        match self.cache.get_by_match_and_origin(match_id, origin_iata).await {
            Ok(cached) => {
                info!(match_id, "airfare cache hit");
                return Ok(cached);
            }
            Err(err) if err.is_miss() => {
                debug!(match_id, "airfare cache miss");
            }
            Err(err) => {
                warn!(match_id, error = %err, "airfare cache read failed");
            }
        }

        let m = self.match_reader.get_match(match_id).await?;

        let destination = m.destination_iata.trim().to_uppercase();
        let origin = origin_iata.trim().to_uppercase();
        if origin == destination {
            warn!(match_id, destination_iata = %destination, "origin equals destination");
            return Err(AirfareError::InvalidRoute);
        }

        let kickoff_utc = m.kickoff_utc;
        let mut result = AirfareByMatch {
            match_id: m.match_id,
            tickets_link: m.tickets_link.clone(),
            slots: default_slots(kickoff_utc),
        };

        let mut source_failures = 0usize;
        for i in 0..result.slots.len() {
            let search = fare_search_for_slot(&result.slots[i], &origin, &destination, kickoff_utc);
            match self.fare_source.prices(&search).await {
                Ok(prices) => result.slots[i].prices = prices,
                Err(err) => {
                    source_failures += 1;
                    warn!(
                        match_id,
                        slot = result.slots[i].kind.as_str(),
                        error = %err,
                        "failed to fetch prices for slot"
                    );
                }
            }
        }

        if source_failures == result.slots.len() {
            return Err(AirfareError::SourceTemporary);
        }

        if let Err(err) = self
            .cache
            .set_by_match_and_origin(match_id, origin_iata, &result, self.cache_ttl)
            .await
        {
            warn!(match_id, error = %err, "airfare cache write failed");
        }

        info!(match_id, slots = result.slots.len(), "airfare slots built");
        Ok(result)
    }
}

/// The six search windows around a kickoff, in their fixed order, with empty
/// price lists. A pure function of the kickoff instant.
pub fn default_slots(kickoff_utc: DateTime<Utc>) -> Vec<FareSlot> {
    let day = kickoff_utc.date_naive().and_time(NaiveTime::MIN).and_utc();

    let slot = |kind, direction, date_utc| FareSlot {
        kind,
        direction,
        date_utc,
        prices: Vec::new(),
    };

    vec![
        slot(SlotKind::OutDMinus2, Direction::Out, day - Days::new(2)),
        slot(SlotKind::OutDMinus1, Direction::Out, day - Days::new(1)),
        slot(SlotKind::OutD0ArriveBy, Direction::Out, day),
        slot(SlotKind::RetD0DepartAfter, Direction::Ret, day),
        slot(SlotKind::RetDPlus1, Direction::Ret, day + Days::new(1)),
        slot(SlotKind::RetDPlus2, Direction::Ret, day + Days::new(2)),
    ]
}

/// The fare-source query for one slot. Outbound slots fly origin →
/// destination, return slots the other way round; the two kickoff-day slots
/// carry their time-of-day bound.
pub fn fare_search_for_slot(
    slot: &FareSlot,
    origin_iata: &str,
    destination_iata: &str,
    kickoff_utc: DateTime<Utc>,
) -> FareSearch {
    let (origin, destination) = match slot.direction {
        Direction::Out => (origin_iata, destination_iata),
        Direction::Ret => (destination_iata, origin_iata),
    };

    let mut search = FareSearch {
        origin_iata: origin.trim().to_uppercase(),
        destination_iata: destination.trim().to_uppercase(),
        date_utc: slot.date_utc,
        arrive_not_later_utc: None,
        depart_not_before_utc: None,
    };

    match slot.kind {
        SlotKind::OutD0ArriveBy => {
            search.arrive_not_later_utc = Some(kickoff_utc - Duration::hours(4));
        }
        SlotKind::RetD0DepartAfter => {
            search.depart_not_before_utc = Some(kickoff_utc + Duration::hours(2));
        }
        _ => {}
    }

    search
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn kickoff() -> DateTime<Utc> {
        // Match 16114: 2026-02-27 22:30 MSK, i.e. 19:30 UTC
        Utc.with_ymd_and_hms(2026, 2, 27, 19, 30, 0).unwrap()
    }

    #[test]
    fn six_slots_in_fixed_order() {
        let slots = default_slots(kickoff());

        let kinds: Vec<SlotKind> = slots.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SlotKind::OutDMinus2,
                SlotKind::OutDMinus1,
                SlotKind::OutD0ArriveBy,
                SlotKind::RetD0DepartAfter,
                SlotKind::RetDPlus1,
                SlotKind::RetDPlus2,
            ]
        );

        for slot in &slots[..3] {
            assert_eq!(slot.direction, Direction::Out);
        }
        for slot in &slots[3..] {
            assert_eq!(slot.direction, Direction::Ret);
        }
        for slot in &slots {
            assert!(slot.prices.is_empty());
        }
    }

    #[test]
    fn slot_dates_bracket_the_kickoff_day() {
        let slots = default_slots(kickoff());
        let day = |d: u32| Utc.with_ymd_and_hms(2026, 2, d, 0, 0, 0).unwrap();

        assert_eq!(slots[0].date_utc, day(25));
        assert_eq!(slots[1].date_utc, day(26));
        assert_eq!(slots[2].date_utc, day(27));
        assert_eq!(slots[3].date_utc, day(27));
        assert_eq!(slots[4].date_utc, day(28));
        assert_eq!(slots[5].date_utc, Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn kickoff_day_slots_carry_their_bounds() {
        let slots = default_slots(kickoff());

        let arrive = fare_search_for_slot(&slots[2], "MOW", "LED", kickoff());
        assert_eq!(
            arrive.arrive_not_later_utc,
            Some(Utc.with_ymd_and_hms(2026, 2, 27, 15, 30, 0).unwrap())
        );
        assert_eq!(arrive.depart_not_before_utc, None);

        let depart = fare_search_for_slot(&slots[3], "MOW", "LED", kickoff());
        assert_eq!(
            depart.depart_not_before_utc,
            Some(Utc.with_ymd_and_hms(2026, 2, 27, 21, 30, 0).unwrap())
        );
        assert_eq!(depart.arrive_not_later_utc, None);
    }

    #[test]
    fn outer_slots_carry_no_bounds() {
        let slots = default_slots(kickoff());
        for idx in [0, 1, 4, 5] {
            let search = fare_search_for_slot(&slots[idx], "MOW", "LED", kickoff());
            assert_eq!(search.arrive_not_later_utc, None);
            assert_eq!(search.depart_not_before_utc, None);
        }
    }

    #[test]
    fn return_slots_swap_the_route() {
        let slots = default_slots(kickoff());

        let out = fare_search_for_slot(&slots[0], " mow ", "led", kickoff());
        assert_eq!(out.origin_iata, "MOW");
        assert_eq!(out.destination_iata, "LED");

        let ret = fare_search_for_slot(&slots[4], " mow ", "led", kickoff());
        assert_eq!(ret.origin_iata, "LED");
        assert_eq!(ret.destination_iata, "MOW");
    }

    #[test]
    fn slot_derivation_is_deterministic() {
        assert_eq!(default_slots(kickoff()), default_slots(kickoff()));
    }
}

mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use common::*;

use fanflight::cache::AirfareCacheStore;
use fanflight::error::{AirfareError, FareError};
use fanflight::models::{AirfareByMatch, Direction, FareSlot, SlotKind};
use fanflight::services::AirfareService;

fn service(
    reader: Arc<FakeMatchReader>,
    fares: Arc<FakeFareSource>,
    cache: Arc<MemoryAirfareCache>,
) -> AirfareService {
    AirfareService::new(reader, fares, cache, Duration::from_secs(600))
}

fn minimal_cached_airfare() -> AirfareByMatch {
    AirfareByMatch {
        match_id: 16114,
        tickets_link: "https://tickets.example/16114".to_string(),
        slots: vec![FareSlot {
            kind: SlotKind::OutDMinus2,
            direction: Direction::Out,
            date_utc: Utc.with_ymd_and_hms(2026, 2, 25, 0, 0, 0).unwrap(),
            prices: vec![4200],
        }],
    }
}

#[tokio::test]
async fn cache_hit_short_circuits_match_and_fare_lookups() {
    let reader = Arc::new(FakeMatchReader::returning(snapshot_16114()));
    let fares = Arc::new(FakeFareSource::scripted(vec![]));
    let cached = minimal_cached_airfare();
    let cache = Arc::new(MemoryAirfareCache::preloaded(16114, "MOW", cached.clone()));

    let service = service(reader.clone(), fares.clone(), cache);
    let result = service.get_airfare_by_match(16114, "MOW").await.unwrap();

    assert_eq!(result, cached);
    assert_eq!(reader.call_count(), 0, "match RPC must not be called");
    assert_eq!(fares.call_count(), 0, "fare source must not be called");
}

#[tokio::test]
async fn all_six_slot_failures_surface_unavailable_without_cache_write() {
    let reader = Arc::new(FakeMatchReader::returning(snapshot_16114()));
    let fares = Arc::new(FakeFareSource::always_failing());
    let cache = Arc::new(MemoryAirfareCache::empty());

    let service = service(reader, fares.clone(), cache.clone());
    let err = service.get_airfare_by_match(16114, "MOW").await.unwrap_err();

    assert!(matches!(err, AirfareError::SourceTemporary));
    assert_eq!(fares.call_count(), 6);
    assert_eq!(cache.write_count(), 0, "failed result must not be cached");
}

#[tokio::test]
async fn partial_failures_keep_empty_price_lists_and_cache_the_result() {
    let reader = Arc::new(FakeMatchReader::returning(snapshot_16114()));
    let fares = Arc::new(FakeFareSource::scripted(vec![
        Ok(vec![1000, 3000]),
        Err(FareError::Status(502)),
        Ok(vec![]),
        Ok(vec![2000]),
        Err(FareError::Status(500)),
        Ok(vec![900]),
    ]));
    let cache = Arc::new(MemoryAirfareCache::empty());

    let service = service(reader, fares, cache.clone());
    let result = service.get_airfare_by_match(16114, "MOW").await.unwrap();

    assert_eq!(result.match_id, 16114);
    assert_eq!(result.tickets_link, "https://tickets.example/16114");
    assert_eq!(result.slots.len(), 6);

    let kinds: Vec<SlotKind> = result.slots.iter().map(|s| s.kind).collect();
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

    let prices: Vec<Vec<i64>> = result.slots.iter().map(|s| s.prices.clone()).collect();
    assert_eq!(
        prices,
        vec![
            vec![1000, 3000],
            vec![],
            vec![],
            vec![2000],
            vec![],
            vec![900],
        ]
    );

    assert_eq!(cache.write_count(), 1);
    let cached = cache.get_by_match_and_origin(16114, "MOW").await.unwrap();
    assert_eq!(cached, result, "cache must hold exactly what was returned");
}

#[tokio::test]
async fn slot_searches_carry_routes_dates_and_bounds() {
    let reader = Arc::new(FakeMatchReader::returning(snapshot_16114()));
    let fares = Arc::new(FakeFareSource::scripted(vec![]));
    let cache = Arc::new(MemoryAirfareCache::empty());

    let service = service(reader, fares.clone(), cache);
    service.get_airfare_by_match(16114, " mow ").await.unwrap();

    let searches = fares.recorded_searches();
    assert_eq!(searches.len(), 6);

    // Outbound slots fly MOW -> LED, return slots LED -> MOW.
    for search in &searches[..3] {
        assert_eq!(search.origin_iata, "MOW");
        assert_eq!(search.destination_iata, "LED");
    }
    for search in &searches[3..] {
        assert_eq!(search.origin_iata, "LED");
        assert_eq!(search.destination_iata, "MOW");
    }

    let day = |d: u32| Utc.with_ymd_and_hms(2026, 2, d, 0, 0, 0).unwrap();
    assert_eq!(searches[0].date_utc, day(25));
    assert_eq!(searches[1].date_utc, day(26));
    assert_eq!(searches[2].date_utc, day(27));
    assert_eq!(searches[3].date_utc, day(27));
    assert_eq!(searches[4].date_utc, day(28));
    assert_eq!(
        searches[5].date_utc,
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
    );

    // Kickoff 19:30 UTC: arrive by 15:30, depart after 21:30.
    assert_eq!(
        searches[2].arrive_not_later_utc,
        Some(Utc.with_ymd_and_hms(2026, 2, 27, 15, 30, 0).unwrap())
    );
    assert_eq!(
        searches[3].depart_not_before_utc,
        Some(Utc.with_ymd_and_hms(2026, 2, 27, 21, 30, 0).unwrap())
    );

    for idx in [0, 1, 4, 5] {
        assert_eq!(searches[idx].arrive_not_later_utc, None);
        assert_eq!(searches[idx].depart_not_before_utc, None);
    }
}

#[tokio::test]
async fn origin_matching_destination_is_rejected_before_any_fare_call() {
    let reader = Arc::new(FakeMatchReader::returning(snapshot_16114()));
    let fares = Arc::new(FakeFareSource::scripted(vec![]));
    let cache = Arc::new(MemoryAirfareCache::empty());

    let service = service(reader, fares.clone(), cache);
    let err = service.get_airfare_by_match(16114, " led ").await.unwrap_err();

    assert!(matches!(err, AirfareError::InvalidRoute));
    assert_eq!(fares.call_count(), 0);
}

#[tokio::test]
async fn blank_origin_and_unknown_match_are_rejected() {
    let reader = Arc::new(FakeMatchReader::not_found());
    let fares = Arc::new(FakeFareSource::scripted(vec![]));
    let cache = Arc::new(MemoryAirfareCache::empty());

    let service = service(reader, fares, cache);

    let err = service.get_airfare_by_match(16114, "   ").await.unwrap_err();
    assert!(matches!(err, AirfareError::InvalidOrigin));

    let err = service.get_airfare_by_match(16114, "MOW").await.unwrap_err();
    assert!(matches!(err, AirfareError::MatchNotFound));
}

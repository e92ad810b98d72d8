#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use fanflight::cache::{airfare_key, AirfareCacheStore};
use fanflight::error::{AirfareError, CacheError, FareError};
use fanflight::fares::FareSource;
use fanflight::models::{AirfareByMatch, FareSearch, MatchSnapshot};
use fanflight::services::MatchReader;

/// Match 16114: kickoff 2026-02-27 22:30 MSK = 19:30 UTC, hosted in
/// Saint Petersburg.
pub fn snapshot_16114() -> MatchSnapshot {
    MatchSnapshot {
        match_id: 16114,
        kickoff_utc: Utc.with_ymd_and_hms(2026, 2, 27, 19, 30, 0).unwrap(),
        destination_iata: "LED".to_string(),
        tickets_link: "https://tickets.example/16114".to_string(),
        home_club_id: "5".to_string(),
        away_club_id: "7".to_string(),
        city: "Saint Petersburg".to_string(),
        stadium: "Gazprom Arena".to_string(),
    }
}

pub struct FakeMatchReader {
    snapshot: Option<MatchSnapshot>,
    pub calls: AtomicUsize,
}

impl FakeMatchReader {
    pub fn returning(snapshot: MatchSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn not_found() -> Self {
        Self {
            snapshot: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MatchReader for FakeMatchReader {
    async fn get_match(&self, _match_id: i64) -> Result<MatchSnapshot, AirfareError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.snapshot.clone().ok_or(AirfareError::MatchNotFound)
    }
}

/// Fare source replaying a scripted result per call, in order. Extra calls
/// get an empty price list.
pub struct FakeFareSource {
    results: Mutex<VecDeque<Result<Vec<i64>, FareError>>>,
    pub searches: Mutex<Vec<FareSearch>>,
    pub calls: AtomicUsize,
}

impl FakeFareSource {
    pub fn scripted(results: Vec<Result<Vec<i64>, FareError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            searches: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always_failing() -> Self {
        Self::scripted(
            (0..6)
                .map(|_| Err(FareError::Status(500)))
                .collect(),
        )
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn recorded_searches(&self) -> Vec<FareSearch> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl FareSource for FakeFareSource {
    async fn prices(&self, search: &FareSearch) -> Result<Vec<i64>, FareError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.searches.lock().unwrap().push(search.clone());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Vec::new()))
    }
}

/// In-memory stand-in for the redis airfare cache.
pub struct MemoryAirfareCache {
    entries: Mutex<HashMap<String, AirfareByMatch>>,
    pub writes: AtomicUsize,
}

impl MemoryAirfareCache {
    pub fn empty() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn preloaded(match_id: i64, origin_iata: &str, payload: AirfareByMatch) -> Self {
        let cache = Self::empty();
        cache
            .entries
            .lock()
            .unwrap()
            .insert(airfare_key(match_id, origin_iata), payload);
        cache
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AirfareCacheStore for MemoryAirfareCache {
    async fn get_by_match_and_origin(
        &self,
        match_id: i64,
        origin_iata: &str,
    ) -> Result<AirfareByMatch, CacheError> {
        self.entries
            .lock()
            .unwrap()
            .get(&airfare_key(match_id, origin_iata))
            .cloned()
            .ok_or(CacheError::Miss)
    }

    async fn set_by_match_and_origin(
        &self,
        match_id: i64,
        origin_iata: &str,
        payload: &AirfareByMatch,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .insert(airfare_key(match_id, origin_iata), payload.clone());
        Ok(())
    }
}

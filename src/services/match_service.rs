use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, Utc};
use tracing::{debug, info, warn};

use crate::cache::MatchCacheStore;
use crate::error::MatchError;
use crate::football::FootballSource;
use crate::models::{Club, Match, MatchId};
use crate::repositories::{CityIataRepository, ClubRepository, MatchRepository};

const DEFAULT_UPCOMING_LIMIT: i64 = 10;
const MAX_UPCOMING_LIMIT: i64 = 100;

/// Outcome of one sync tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    pub requested: usize,
    pub saved: usize,
    pub failed: usize,
}

/// Match ingestion: cached reads, durable fallback, upstream last resort,
/// and the periodic horizon sync.
pub struct MatchService {
    source: FootballSource,
    resolver: CityIataRepository,
    repo: MatchRepository,
    clubs: ClubRepository,
    cache: Arc<dyn MatchCacheStore>,
    cache_ttl: Duration,
}

impl MatchService {
    pub fn new(
        source: FootballSource,
        resolver: CityIataRepository,
        repo: MatchRepository,
        clubs: ClubRepository,
        cache: Arc<dyn MatchCacheStore>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            source,
            resolver,
            repo,
            clubs,
            cache,
            cache_ttl,
        }
    }

    /// Read path: cache, then durable store, then upstream as a last resort
    /// (persisting and priming the cache on the way back).
    pub async fn get_match(&self, id: &MatchId) -> Result<Match, MatchError> {
        match self.cache.get_by_id(id).await {
            Ok(m) => {
                debug!(match_id = %id, "match loaded from cache");
                return Ok(m);
            }
            Err(err) if !err.is_miss() => {
                warn!(match_id = %id, error = %err, "cache read failed");
            }
            Err(_) => {}
        }

        let numeric = id
            .numeric()
            .ok_or_else(|| MatchError::InvalidMatchId(id.to_string()))?;

        if let Some(m) = self.repo.find_by_id(numeric).await? {
            debug!(match_id = %id, "match loaded from db");
            self.prime_cache(&m).await;
            return Ok(m);
        }

        let mut m = self.source.fetch_by_id(id).await?;
        if m.destination_iata.is_empty() {
            m.destination_iata = self
                .resolver
                .resolve(&m.city)
                .await?
                .ok_or_else(|| MatchError::CityIataNotFound(m.city.clone()))?;
        }

        self.repo.upsert(numeric, &m).await?;
        self.prime_cache(&m).await;

        info!(match_id = %id, "match fetched from source and saved");
        Ok(m)
    }

    pub async fn get_upcoming(&self, limit: i64, club_id: &str) -> Result<Vec<Match>, MatchError> {
        let limit = normalize_upcoming_limit(limit);

        let matches = self.repo.find_upcoming(limit, club_id.trim()).await?;
        Ok(matches)
    }

    pub async fn get_clubs(&self) -> Result<Vec<Club>, MatchError> {
        Ok(self.clubs.list().await?)
    }

    /// One sync pass over the horizon window: discover ids, hydrate each,
    /// resolve destinations, upsert, prime the cache. Per-item failures are
    /// counted; a tick that discovered ids but saved none is itself a failure.
    pub async fn sync_upcoming(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: usize,
    ) -> Result<SyncOutcome, MatchError> {
        let to = if to <= from { from + Days::new(30) } else { to };

        let ids = self.source.fetch_upcoming_ids(from, to, limit).await?;
        if ids.is_empty() {
            info!("no upcoming matches from source");
            return Ok(SyncOutcome {
                requested: 0,
                saved: 0,
                failed: 0,
            });
        }

        let mut saved = 0usize;
        let mut failed = 0usize;

        for id in &ids {
            // A deadline or cancellation in any per-item call aborts the
            // whole tick; everything else is a per-item failure.
            let mut m = match self.source.fetch_by_id(id).await {
                Ok(m) => m,
                Err(err) if err.is_interrupt() => return Err(err),
                Err(err) => {
                    failed += 1;
                    warn!(match_id = %id, error = %err, "failed to fetch match by id");
                    continue;
                }
            };

            if m.destination_iata.is_empty() {
                match self.resolver.resolve(&m.city).await.map_err(MatchError::from) {
                    Ok(Some(iata)) => m.destination_iata = iata,
                    Ok(None) => {
                        failed += 1;
                        warn!(match_id = %id, city = %m.city, "no IATA for city, skipping match");
                        continue;
                    }
                    Err(err) if err.is_interrupt() => return Err(err),
                    Err(err) => {
                        failed += 1;
                        warn!(match_id = %id, error = %err, "destination resolution failed");
                        continue;
                    }
                }
            }

            let Some(numeric) = m.id.numeric() else {
                failed += 1;
                warn!(match_id = %id, "source returned invalid match id");
                continue;
            };

            if let Err(err) = self.repo.upsert(numeric, &m).await.map_err(MatchError::from) {
                if err.is_interrupt() {
                    return Err(err);
                }
                failed += 1;
                warn!(match_id = %id, error = %err, "failed to upsert match");
                continue;
            }

            self.prime_cache(&m).await;
            saved += 1;
        }

        info!(
            requested = ids.len(),
            saved, failed, "upcoming matches sync finished"
        );

        if saved == 0 {
            return Err(MatchError::NothingSynced);
        }

        Ok(SyncOutcome {
            requested: ids.len(),
            saved,
            failed,
        })
    }

    async fn prime_cache(&self, m: &Match) {
        if let Err(err) = self.cache.set(m, self.cache_ttl).await {
            warn!(match_id = %m.id, error = %err, "cache write failed");
        }
    }
}

fn normalize_upcoming_limit(limit: i64) -> i64 {
    if limit <= 0 {
        DEFAULT_UPCOMING_LIMIT
    } else {
        limit.min(MAX_UPCOMING_LIMIT)
    }
}

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::error::CacheError;
use crate::models::AirfareByMatch;

/// TTL-bounded cache of assembled airfare results keyed by (match, origin).
#[async_trait]
pub trait AirfareCacheStore: Send + Sync {
    async fn get_by_match_and_origin(
        &self,
        match_id: i64,
        origin_iata: &str,
    ) -> Result<AirfareByMatch, CacheError>;

    async fn set_by_match_and_origin(
        &self,
        match_id: i64,
        origin_iata: &str,
        payload: &AirfareByMatch,
        ttl: Duration,
    ) -> Result<(), CacheError>;
}

pub struct AirfareCache {
    redis: ConnectionManager,
}

impl AirfareCache {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl AirfareCacheStore for AirfareCache {
    async fn get_by_match_and_origin(
        &self,
        match_id: i64,
        origin_iata: &str,
    ) -> Result<AirfareByMatch, CacheError> {
        let key = super::airfare_key(match_id, origin_iata);
        let mut conn = self.redis.clone();

        let data: Option<String> = conn.get(&key).await?;
        let data = data.ok_or(CacheError::Miss)?;

        Ok(serde_json::from_str(&data)?)
    }

    async fn set_by_match_and_origin(
        &self,
        match_id: i64,
        origin_iata: &str,
        payload: &AirfareByMatch,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        if ttl.is_zero() {
            return Ok(());
        }

        let key = super::airfare_key(match_id, origin_iata);
        let data = serde_json::to_string(payload)?;

        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(&key, data, ttl.as_secs()).await?;

        Ok(())
    }
}

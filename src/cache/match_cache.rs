use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::error::CacheError;
use crate::models::{Match, MatchId};

/// TTL-bounded cache of match snapshots keyed by id.
#[async_trait]
pub trait MatchCacheStore: Send + Sync {
    /// `CacheError::Miss` when the key is absent or expired.
    async fn get_by_id(&self, id: &MatchId) -> Result<Match, CacheError>;

    async fn set(&self, m: &Match, ttl: Duration) -> Result<(), CacheError>;
}

pub struct MatchCache {
    redis: ConnectionManager,
}

impl MatchCache {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl MatchCacheStore for MatchCache {
    async fn get_by_id(&self, id: &MatchId) -> Result<Match, CacheError> {
        let key = super::match_key(id.as_str());
        let mut conn = self.redis.clone();

        let data: Option<String> = conn.get(&key).await?;
        let data = data.ok_or(CacheError::Miss)?;

        Ok(serde_json::from_str(&data)?)
    }

    async fn set(&self, m: &Match, ttl: Duration) -> Result<(), CacheError> {
        if ttl.is_zero() {
            return Ok(());
        }

        let key = super::match_key(m.id.as_str());
        let payload = serde_json::to_string(m)?;

        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(&key, payload, ttl.as_secs()).await?;

        Ok(())
    }
}

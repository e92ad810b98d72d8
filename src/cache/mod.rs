pub mod airfare_cache;
pub mod match_cache;

pub use airfare_cache::{AirfareCache, AirfareCacheStore};
pub use match_cache::{MatchCache, MatchCacheStore};

use redis::aio::ConnectionManager;

use crate::config::RedisConfig;

/// Open a managed redis connection. The manager reconnects on its own, so a
/// transient cache outage degrades reads instead of failing startup forever.
pub async fn connect(config: &RedisConfig) -> Result<ConnectionManager, redis::RedisError> {
    let client = redis::Client::open(config.url())?;
    ConnectionManager::new(client).await
}

/// Key for a cached match snapshot: `match:{id}`
pub fn match_key(id: &str) -> String {
    format!("match:{}", id)
}

/// Key for a cached airfare result: `airfare:{matchID}:{UPPER(origin)}`
pub fn airfare_key(match_id: i64, origin_iata: &str) -> String {
    format!(
        "airfare:{}:{}",
        match_id,
        origin_iata.trim().to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn airfare_key_uppercases_and_trims_origin() {
        assert_eq!(airfare_key(16114, " mow "), "airfare:16114:MOW");
    }

    #[test]
    fn match_key_shape() {
        assert_eq!(match_key("16114"), "match:16114");
    }
}

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL environment variable is required".to_string())?;

        let max_connections = env_parse("DATABASE_MAX_CONNECTIONS", 10u32);
        let acquire_timeout_secs = env_parse("DATABASE_ACQUIRE_TIMEOUT_SECS", 30u64);

        if max_connections == 0 {
            return Err("DATABASE_MAX_CONNECTIONS must be greater than 0".to_string());
        }

        Ok(Self {
            url,
            max_connections,
            acquire_timeout_secs,
        })
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

/// Ephemeral cache (redis) configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub addr: String,
    pub password: String,
    pub db: i64,
}

impl RedisConfig {
    pub fn from_env() -> Self {
        Self {
            addr: env_string("REDIS_ADDR", "127.0.0.1:6379"),
            password: env_string("REDIS_PASSWORD", ""),
            db: env_parse("REDIS_DB", 0i64),
        }
    }

    /// Connection URL in the form redis://[:password@]addr/db
    pub fn url(&self) -> String {
        if self.password.is_empty() {
            format!("redis://{}/{}", self.addr, self.db)
        } else {
            format!("redis://:{}@{}/{}", self.password, self.addr, self.db)
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:6379".to_string(),
            password: String::new(),
            db: 0,
        }
    }
}

/// Upstream football API client configuration
#[derive(Debug, Clone)]
pub struct FootballConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub retry_max_attempts: u32,
    pub retry_base_interval_ms: u64,
}

impl FootballConfig {
    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("FOOTBALL_BASE_URL")
            .map_err(|_| "FOOTBALL_BASE_URL environment variable is required".to_string())?;

        Ok(Self {
            base_url,
            timeout_secs: env_parse("FOOTBALL_TIMEOUT_SECS", 5u64),
            retry_max_attempts: env_parse("FOOTBALL_RETRY_MAX_ATTEMPTS", 3u32),
            retry_base_interval_ms: env_parse("FOOTBALL_RETRY_BASE_INTERVAL_MS", 100u64),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_base_interval(&self) -> Duration {
        Duration::from_millis(self.retry_base_interval_ms)
    }
}

/// Periodic sync configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub enabled: bool,
    pub interval_secs: u64,
    pub horizon_days: i64,
    pub request_timeout_secs: u64,
    pub limit: usize,
}

impl SyncConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: env_parse("SYNC_ENABLED", true),
            interval_secs: env_parse("SYNC_INTERVAL_SECS", 900u64),
            horizon_days: env_parse("SYNC_HORIZON_DAYS", 30i64),
            request_timeout_secs: env_parse("SYNC_REQUEST_TIMEOUT_SECS", 30u64),
            limit: env_parse("SYNC_LIMIT", 100usize),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 900,
            horizon_days: 30,
            request_timeout_secs: 30,
            limit: 100,
        }
    }
}

/// Fare source (travel prices API) configuration
#[derive(Debug, Clone)]
pub struct FareSourceConfig {
    pub base_url: String,
    pub token: String,
    pub currency: String,
    pub limit: u32,
    pub timeout_secs: u64,
}

impl FareSourceConfig {
    pub fn from_env() -> Result<Self, String> {
        let token = env::var("FARES_TOKEN")
            .map_err(|_| "FARES_TOKEN environment variable is required".to_string())?;
        if token.trim().is_empty() {
            return Err("FARES_TOKEN must not be blank".to_string());
        }

        Ok(Self {
            base_url: env_string("FARES_BASE_URL", "https://api.travelpayouts.com"),
            token,
            currency: env_string("FARES_CURRENCY", "rub"),
            limit: env_parse("FARES_LIMIT", 30u32),
            timeout_secs: env_parse("FARES_TIMEOUT_SECS", 5u64),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// gRPC client configuration for one downstream service
#[derive(Debug, Clone)]
pub struct GrpcClientConfig {
    pub address: String,
    pub timeout_secs: u64,
}

impl GrpcClientConfig {
    pub fn from_env(addr_key: &str, timeout_key: &str, default_timeout: u64) -> Result<Self, String> {
        let address = env::var(addr_key)
            .map_err(|_| format!("{} environment variable is required", addr_key))?;

        Ok(Self {
            address,
            timeout_secs: env_parse(timeout_key, default_timeout),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub read_timeout_secs: u64,
    pub write_timeout_secs: u64,
    pub shutdown_timeout_secs: u64,
}

impl HttpConfig {
    pub fn from_env() -> Self {
        Self {
            host: env_string("HTTP_HOST", "0.0.0.0"),
            port: env_parse("HTTP_PORT", 8080u16),
            read_timeout_secs: env_parse("HTTP_READ_TIMEOUT_SECS", 5u64),
            write_timeout_secs: env_parse("HTTP_WRITE_TIMEOUT_SECS", 30u64),
            shutdown_timeout_secs: env_parse("HTTP_SHUTDOWN_TIMEOUT_SECS", 5u64),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            read_timeout_secs: 5,
            write_timeout_secs: 30,
            shutdown_timeout_secs: 5,
        }
    }
}

/// Match ingestion service configuration
#[derive(Debug, Clone)]
pub struct MatchServiceConfig {
    pub log_level: String,
    pub grpc_host: String,
    pub grpc_port: u16,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub football: FootballConfig,
    pub match_cache_ttl_secs: u64,
    pub sync: SyncConfig,
}

impl MatchServiceConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            log_level: log_level_from_env()?,
            grpc_host: env_string("GRPC_HOST", "0.0.0.0"),
            grpc_port: env_parse("GRPC_PORT", 50051u16),
            database: DatabaseConfig::from_env()?,
            redis: RedisConfig::from_env(),
            football: FootballConfig::from_env()?,
            match_cache_ttl_secs: env_parse("MATCH_CACHE_TTL_SECS", 300u64),
            sync: SyncConfig::from_env(),
        })
    }

    pub fn grpc_addr(&self) -> String {
        format!("{}:{}", self.grpc_host, self.grpc_port)
    }

    pub fn match_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.match_cache_ttl_secs)
    }
}

/// Airfare service configuration
#[derive(Debug, Clone)]
pub struct AirfareServiceConfig {
    pub log_level: String,
    pub grpc_host: String,
    pub grpc_port: u16,
    pub redis: RedisConfig,
    pub fares: FareSourceConfig,
    pub match_client: GrpcClientConfig,
    pub airfare_cache_ttl_secs: u64,
}

impl AirfareServiceConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            log_level: log_level_from_env()?,
            grpc_host: env_string("GRPC_HOST", "0.0.0.0"),
            grpc_port: env_parse("GRPC_PORT", 50052u16),
            redis: RedisConfig::from_env(),
            fares: FareSourceConfig::from_env()?,
            match_client: GrpcClientConfig::from_env("MATCH_ADDRESS", "MATCH_CLIENT_TIMEOUT_SECS", 3)?,
            airfare_cache_ttl_secs: env_parse("AIRFARE_CACHE_TTL_SECS", 600u64),
        })
    }

    pub fn grpc_addr(&self) -> String {
        format!("{}:{}", self.grpc_host, self.grpc_port)
    }

    pub fn airfare_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.airfare_cache_ttl_secs)
    }
}

/// API gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub log_level: String,
    pub http: HttpConfig,
    pub match_client: GrpcClientConfig,
    pub airfare_client: GrpcClientConfig,
    pub catalog_timeout_secs: u64,
    pub default_origin_iata: String,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            log_level: log_level_from_env()?,
            http: HttpConfig::from_env(),
            match_client: GrpcClientConfig::from_env("MATCH_ADDRESS", "MATCH_CLIENT_TIMEOUT_SECS", 5)?,
            airfare_client: GrpcClientConfig::from_env(
                "AIRFARE_ADDRESS",
                "AIRFARE_CLIENT_TIMEOUT_SECS",
                5,
            )?,
            catalog_timeout_secs: env_parse("CATALOG_TIMEOUT_SECS", 20u64),
            default_origin_iata: env_string("DEFAULT_ORIGIN_IATA", "")
                .trim()
                .to_uppercase(),
        })
    }

    /// The catalog aggregate deadline: the configured timeout, bounded by the
    /// HTTP write timeout minus 500ms, never below one second.
    pub fn catalog_deadline(&self) -> Duration {
        let configured = Duration::from_secs(self.catalog_timeout_secs.max(1));
        let write_budget = self
            .http
            .write_timeout()
            .saturating_sub(Duration::from_millis(500));
        configured.min(write_budget).max(Duration::from_secs(1))
    }
}

fn log_level_from_env() -> Result<String, String> {
    let log_level = env_string("LOG_LEVEL", "info").to_lowercase();

    let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_log_levels.contains(&log_level.as_str()) {
        return Err(format!(
            "Invalid LOG_LEVEL: {}. Must be one of: {:?}",
            log_level, valid_log_levels
        ));
    }

    Ok(log_level)
}

fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr + Copy>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redis_url_without_password() {
        let cfg = RedisConfig::default();
        assert_eq!(cfg.url(), "redis://127.0.0.1:6379/0");
    }

    #[test]
    fn redis_url_with_password_and_db() {
        let cfg = RedisConfig {
            addr: "cache:6380".to_string(),
            password: "secret".to_string(),
            db: 2,
        };
        assert_eq!(cfg.url(), "redis://:secret@cache:6380/2");
    }

    #[test]
    fn catalog_deadline_bounded_by_write_timeout() {
        let cfg = GatewayConfig {
            log_level: "info".to_string(),
            http: HttpConfig {
                write_timeout_secs: 10,
                ..HttpConfig::default()
            },
            match_client: GrpcClientConfig {
                address: "http://m".to_string(),
                timeout_secs: 5,
            },
            airfare_client: GrpcClientConfig {
                address: "http://a".to_string(),
                timeout_secs: 5,
            },
            catalog_timeout_secs: 20,
            default_origin_iata: String::new(),
        };
        assert_eq!(cfg.catalog_deadline(), Duration::from_millis(9_500));
    }

    #[test]
    fn catalog_deadline_never_below_one_second() {
        let cfg = GatewayConfig {
            log_level: "info".to_string(),
            http: HttpConfig {
                write_timeout_secs: 1,
                ..HttpConfig::default()
            },
            match_client: GrpcClientConfig {
                address: "http://m".to_string(),
                timeout_secs: 5,
            },
            airfare_client: GrpcClientConfig {
                address: "http://a".to_string(),
                timeout_secs: 5,
            },
            catalog_timeout_secs: 20,
            default_origin_iata: String::new(),
        };
        assert_eq!(cfg.catalog_deadline(), Duration::from_secs(1));
    }

    #[test]
    fn sync_defaults() {
        let cfg = SyncConfig::default();
        assert!(cfg.enabled);
        assert_eq!(cfg.horizon_days, 30);
        assert_eq!(cfg.limit, 100);
    }
}

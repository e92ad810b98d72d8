use thiserror::Error;

/// Failures of the upstream football API client.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Network error, HTTP 5xx or 429 once the retry budget is exhausted.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// Permanent non-retryable HTTP status (4xx other than 429).
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// HTTP 404 on endpoints that opt into not-found semantics.
    #[error("not found at source")]
    NotFound,

    /// Malformed payload: decode failure, unsupported envelope, bad date.
    #[error("malformed source payload: {0}")]
    Decode(String),

    /// The per-request deadline elapsed.
    #[error("source request timed out")]
    Timeout,
}

/// Match ingestion errors.
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("match not found")]
    NotFound,

    #[error("no IATA code for city {0:?}")]
    CityIataNotFound(String),

    #[error("invalid match id {0:?}")]
    InvalidMatchId(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// The request was abandoned mid-flight (e.g. the pool closed during
    /// shutdown).
    #[error("request canceled")]
    Canceled,

    /// A sync tick discovered ids but saved none of them.
    #[error("no matches synced")]
    NothingSynced,
}

impl MatchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, MatchError::NotFound)
    }

    /// Deadline or cancellation. Multi-item work (the sync tick) aborts
    /// immediately on these instead of counting a per-item failure.
    pub fn is_interrupt(&self) -> bool {
        matches!(
            self,
            MatchError::Canceled | MatchError::Source(SourceError::Timeout)
        )
    }
}

impl From<sqlx::Error> for MatchError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed => MatchError::Canceled,
            err => MatchError::Database(err),
        }
    }
}

/// Airfare service errors.
#[derive(Error, Debug)]
pub enum AirfareError {
    #[error("origin iata is blank")]
    InvalidOrigin,

    #[error("origin and destination must differ")]
    InvalidRoute,

    #[error("match not found")]
    MatchNotFound,

    /// Match reader or fare source unavailable after the service's tolerance
    /// (all six slot queries failed).
    #[error("temporary source failure")]
    SourceTemporary,

    #[error("deadline exceeded")]
    Timeout,

    #[error("request canceled")]
    Canceled,

    #[error("internal error: {0}")]
    Internal(String),
}

/// Fare-source client errors. Individual slot failures are tolerated by the
/// airfare service, so these never cross the RPC boundary directly.
#[derive(Error, Debug)]
pub enum FareError {
    #[error("fare source token is empty")]
    MissingToken,

    #[error("fare source status: {0}")]
    Status(u16),

    #[error("fare source request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("decode fare source response: {0}")]
    Decode(String),
}

/// Cache failures. `Miss` means "proceed to the authoritative store"; every
/// other variant is logged and swallowed by callers.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache miss")]
    Miss,

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("cache codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl CacheError {
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::Miss)
    }
}

use sqlx::PgPool;

/// Read-only dictionary mapping canonicalized city names to IATA codes.
pub struct CityIataRepository {
    pool: PgPool,
}

impl CityIataRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve the destination airport for a city. `None` for unknown cities;
    /// the caller decides whether that skips or fails the operation.
    pub async fn resolve(&self, city: &str) -> Result<Option<String>, sqlx::Error> {
        let iata: Option<(String,)> =
            sqlx::query_as("SELECT iata FROM city_iata WHERE city = $1")
                .bind(city)
                .fetch_optional(&self.pool)
                .await?;

        Ok(iata.map(|(code,)| code))
    }
}

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::models::{Match, MatchId};

/// Repository for the `matches` table.
pub struct MatchRepository {
    pool: PgPool,
}

#[derive(FromRow)]
struct MatchRow {
    match_id: i64,
    kickoff_utc: DateTime<Utc>,
    city: String,
    stadium: String,
    destination_iata: String,
    tickets_link: String,
    club_home_id: String,
    club_away_id: String,
}

impl From<MatchRow> for Match {
    fn from(row: MatchRow) -> Self {
        Match {
            id: MatchId::from_numeric(row.match_id),
            home_club_id: row.club_home_id,
            away_club_id: row.club_away_id,
            city: row.city,
            stadium: row.stadium,
            destination_iata: row.destination_iata,
            tickets_link: row.tickets_link,
            kickoff_utc: row.kickoff_utc,
        }
    }
}

const SELECT_COLUMNS: &str = r#"
    match_id,
    kickoff_utc,
    city,
    stadium,
    destination_iata,
    tickets_link,
    COALESCE(club_home_id, '') AS club_home_id,
    COALESCE(club_away_id, '') AS club_away_id
"#;

impl MatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a match by its numeric id. `None` when no row exists.
    pub async fn find_by_id(&self, match_id: i64) -> Result<Option<Match>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM matches WHERE match_id = $1",
            SELECT_COLUMNS
        );

        let row = sqlx::query_as::<_, MatchRow>(&query)
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Match::from))
    }

    /// Upcoming matches ordered by kickoff ascending, optionally filtered by
    /// a club playing home or away.
    pub async fn find_upcoming(
        &self,
        limit: i64,
        club_id: &str,
    ) -> Result<Vec<Match>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {}
            FROM matches
            WHERE kickoff_utc >= now()
              AND ($2 = '' OR club_home_id = $2 OR club_away_id = $2)
            ORDER BY kickoff_utc ASC
            LIMIT $1
            "#,
            SELECT_COLUMNS
        );

        let rows = sqlx::query_as::<_, MatchRow>(&query)
            .bind(limit)
            .bind(club_id.trim())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Match::from).collect())
    }

    /// Insert or fully overwrite a match by id, refreshing `updated_at`.
    pub async fn upsert(&self, match_id: i64, m: &Match) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO matches (
                match_id,
                kickoff_utc,
                city,
                stadium,
                tickets_link,
                destination_iata,
                club_home_id,
                club_away_id,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now())
            ON CONFLICT (match_id) DO UPDATE SET
                kickoff_utc = EXCLUDED.kickoff_utc,
                city = EXCLUDED.city,
                stadium = EXCLUDED.stadium,
                tickets_link = EXCLUDED.tickets_link,
                destination_iata = EXCLUDED.destination_iata,
                club_home_id = EXCLUDED.club_home_id,
                club_away_id = EXCLUDED.club_away_id,
                updated_at = now()
            "#,
        )
        .bind(match_id)
        .bind(m.kickoff_utc)
        .bind(&m.city)
        .bind(&m.stadium)
        .bind(&m.tickets_link)
        .bind(&m.destination_iata)
        .bind(&m.home_club_id)
        .bind(&m.away_club_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

use sqlx::{FromRow, PgPool};

use crate::models::Club;

/// Read-only clubs dictionary.
pub struct ClubRepository {
    pool: PgPool,
}

#[derive(FromRow)]
struct ClubRow {
    club_id: String,
    name_ru: String,
    name_en: String,
}

impl ClubRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Club>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ClubRow>(
            r#"
            SELECT
                club_id,
                name_ru,
                COALESCE(name_en, '') AS name_en
            FROM club_dictionary
            ORDER BY name_ru ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Club {
                id: row.club_id,
                name_ru: row.name_ru,
                name_en: row.name_en,
            })
            .collect())
    }
}

use std::collections::HashSet;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use tracing::debug;

use crate::error::{MatchError, SourceError};
use crate::football::client::FootballClient;
use crate::football::dto::Tournament;
use crate::football::mapper;
use crate::models::{Match, MatchId};

/// Discovery layer over the football client: resolves which tournament
/// seasons can contain matches in a horizon window and harvests candidate
/// match ids from their schedules.
pub struct FootballSource {
    client: FootballClient,
}

impl FootballSource {
    pub fn new(client: FootballClient) -> Self {
        Self { client }
    }

    pub async fn fetch_by_id(&self, id: &MatchId) -> Result<Match, MatchError> {
        let numeric = id
            .numeric()
            .ok_or_else(|| MatchError::InvalidMatchId(id.to_string()))?;

        let payload = self
            .client
            .get_full_data_match(numeric)
            .await
            .map_err(|err| match err {
                SourceError::NotFound => MatchError::NotFound,
                other => MatchError::Source(other),
            })?;
        let m = mapper::to_domain_match(&payload)?;

        Ok(m)
    }

    /// Ids of matches kicking off inside [from, to], kickoff ascending,
    /// capped at `limit`.
    pub async fn fetch_upcoming_ids(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<MatchId>, MatchError> {
        let limit = if limit == 0 { 100 } else { limit };

        let tournaments = self.client.get_tournaments().await?;
        let selected = select_tournaments_for_range(tournaments, from, to);

        let mut candidates: Vec<(MatchId, DateTime<Utc>)> = Vec::new();
        let mut seen: HashSet<i64> = HashSet::new();
        let mut last_err: Option<SourceError> = None;
        let mut loaded = false;

        for tournament in &selected {
            let stages = match self.client.get_matches(tournament.id).await {
                Ok(stages) => stages,
                Err(err @ (SourceError::Unavailable(_) | SourceError::Timeout)) => {
                    return Err(err.into());
                }
                Err(err) => {
                    debug!(tournament = tournament.id, error = %err, "match listing failed");
                    last_err = Some(err);
                    continue;
                }
            };

            loaded = true;
            for stage in stages {
                for item in stage.matches {
                    if item.id <= 0 {
                        continue;
                    }

                    let Ok(kickoff) = mapper::parse_kickoff(&item.date) else {
                        continue;
                    };
                    if kickoff < from || kickoff > to {
                        continue;
                    }

                    if !seen.insert(item.id) {
                        continue;
                    }
                    candidates.push((MatchId::from_numeric(item.id), kickoff));
                }
            }
        }

        if !loaded {
            if let Some(err) = last_err {
                return Err(err.into());
            }
        }

        candidates.sort_by_key(|(_, kickoff)| *kickoff);
        candidates.truncate(limit);

        Ok(candidates.into_iter().map(|(id, _)| id).collect())
    }
}

/// Pick the tournaments whose season interval overlaps [from, to]: newest
/// first (larger ids are newer seasons), at most three. When none overlap,
/// fall back to the two newest with positive ids.
pub(crate) fn select_tournaments_for_range(
    mut tournaments: Vec<Tournament>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<Tournament> {
    if tournaments.is_empty() {
        return tournaments;
    }

    tournaments.sort_by(|a, b| b.id.cmp(&a.id));

    let selected: Vec<Tournament> = tournaments
        .iter()
        .filter(|t| t.id > 0 && tournament_overlaps_range(t, from, to))
        .take(3)
        .cloned()
        .collect();

    if !selected.is_empty() {
        return selected;
    }

    tournaments.into_iter().filter(|t| t.id > 0).take(2).collect()
}

/// A tournament covers [dateFrom, dateTo + 1d); undated tournaments never
/// overlap.
fn tournament_overlaps_range(t: &Tournament, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
    let (Some(start), Some(end)) = (parse_tournament_day(&t.date_from), parse_tournament_day(&t.date_to))
    else {
        return false;
    };

    let end_exclusive = end + Days::new(1);
    end_exclusive > from && start <= to
}

fn parse_tournament_day(value: &str) -> Option<DateTime<Utc>> {
    if value.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|day| day.and_time(NaiveTime::MIN).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tournament(id: i64, date_from: &str, date_to: &str) -> Tournament {
        Tournament {
            id,
            name: format!("Season {}", id),
            archive: false,
            date_from: date_from.to_string(),
            date_to: date_to.to_string(),
        }
    }

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 3, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn picks_overlapping_tournaments_newest_first() {
        let (from, to) = window();
        let picked = select_tournaments_for_range(
            vec![
                tournament(40, "2024-07-13", "2025-05-25"),
                tournament(42, "2025-07-15", "2026-05-24"),
                tournament(41, "2026-02-20", "2026-06-01"),
            ],
            from,
            to,
        );

        let ids: Vec<i64> = picked.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![42, 41]);
    }

    #[test]
    fn caps_selection_at_three() {
        let (from, to) = window();
        let picked = select_tournaments_for_range(
            (1..=5)
                .map(|id| tournament(id, "2026-01-01", "2026-06-01"))
                .collect(),
            from,
            to,
        );
        assert_eq!(picked.len(), 3);
        assert_eq!(picked[0].id, 5);
    }

    #[test]
    fn falls_back_to_two_newest_when_nothing_overlaps() {
        let (from, to) = window();
        let picked = select_tournaments_for_range(
            vec![
                tournament(38, "2022-07-01", "2023-05-30"),
                tournament(-1, "2026-01-01", "2026-06-01"),
                tournament(39, "2023-07-01", "2024-05-30"),
            ],
            from,
            to,
        );

        let ids: Vec<i64> = picked.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![39, 38]);
    }

    #[test]
    fn season_end_day_is_inclusive() {
        let from = Utc.with_ymd_and_hms(2026, 5, 24, 18, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 6, 24, 0, 0, 0).unwrap();
        // dateTo is 2026-05-24; the season still covers that evening.
        assert!(tournament_overlaps_range(
            &tournament(42, "2025-07-15", "2026-05-24"),
            from,
            to
        ));
    }

    #[test]
    fn undated_tournaments_never_overlap() {
        let (from, to) = window();
        assert!(!tournament_overlaps_range(&tournament(42, "", ""), from, to));
    }
}

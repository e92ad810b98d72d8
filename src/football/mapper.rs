use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::SourceError;
use crate::football::dto::FullDataMatch;
use crate::models::{Match, MatchId};

/// Map an upstream match payload into a domain snapshot.
///
/// The destination airport is left empty; the city resolver fills it in when
/// upstream did not.
pub fn to_domain_match(resp: &FullDataMatch) -> Result<Match, SourceError> {
    let kickoff = parse_kickoff(&resp.date)?;

    Ok(Match {
        id: MatchId::from_numeric(resp.id),
        home_club_id: club_id_to_string(resp.club_home),
        away_club_id: club_id_to_string(resp.club_away),
        city: normalize_city(&resp.city).to_string(),
        stadium: resp.stadium.clone(),
        destination_iata: String::new(),
        tickets_link: resp.tickets_link.clone(),
        kickoff_utc: kickoff,
    })
}

fn club_id_to_string(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

/// Parse an upstream kickoff string. Layouts are tried in order; the bare
/// ones are interpreted as UTC. The `YYYY-MM-DDUTCHH:MM:SS` layout is an
/// upstream quirk with a literal `UTC` separator.
pub fn parse_kickoff(value: &str) -> Result<DateTime<Utc>, SourceError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    const LAYOUTS: [&str; 3] = ["%Y-%m-%dUTC%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for layout in LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, layout) {
            return Ok(naive.and_utc());
        }
    }

    Err(SourceError::Decode(format!(
        "unsupported datetime format: {:?}",
        value
    )))
}

/// Canonicalize known Cyrillic host-city names to their Latin form. The table
/// is closed; unknown cities pass through unchanged.
pub fn normalize_city(city: &str) -> &str {
    match city {
        "Санкт-Петербург" => "Saint Petersburg",
        "Москва" => "Moscow",
        "Калининград" => "Kaliningrad",
        _ => city,
    }
}

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque match identifier.
///
/// Carried as a string but always the decimal form of a positive 64-bit
/// integer assigned by the upstream football API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn from_numeric(id: i64) -> Self {
        Self(id.to_string())
    }

    /// The numeric form, or `None` when the id does not parse as a positive
    /// integer.
    pub fn numeric(&self) -> Option<i64> {
        self.0.parse::<i64>().ok().filter(|id| *id > 0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A match snapshot as persisted in the durable store.
///
/// `destination_iata` is non-empty for any persisted snapshot and
/// `kickoff_utc` is always UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// Decimal club id, or empty when upstream sent null.
    pub home_club_id: String,
    pub away_club_id: String,
    /// Canonicalized Latin city name.
    pub city: String,
    pub stadium: String,
    pub destination_iata: String,
    pub tickets_link: String,
    pub kickoff_utc: DateTime<Utc>,
}

/// Read-only clubs dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub id: String,
    pub name_ru: String,
    pub name_en: String,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the six search windows derived from a kickoff instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotKind {
    OutDMinus2,
    OutDMinus1,
    OutD0ArriveBy,
    RetD0DepartAfter,
    RetDPlus1,
    RetDPlus2,
}

impl SlotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKind::OutDMinus2 => "OUT_D_MINUS_2",
            SlotKind::OutDMinus1 => "OUT_D_MINUS_1",
            SlotKind::OutD0ArriveBy => "OUT_D0_ARRIVE_BY",
            SlotKind::RetD0DepartAfter => "RET_D0_DEPART_AFTER",
            SlotKind::RetDPlus1 => "RET_D_PLUS_1",
            SlotKind::RetDPlus2 => "RET_D_PLUS_2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Out,
    Ret,
}

/// A single priced slot. `prices` is ascending, unique and strictly positive;
/// empty when no offer survived (never absent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareSlot {
    pub kind: SlotKind,
    pub direction: Direction,
    pub date_utc: DateTime<Utc>,
    pub prices: Vec<i64>,
}

/// The assembled six-slot price vector for one (match, origin) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirfareByMatch {
    pub match_id: i64,
    pub tickets_link: String,
    pub slots: Vec<FareSlot>,
}

/// One fare-source query. At most one of the two time bounds is set.
#[derive(Debug, Clone, PartialEq)]
pub struct FareSearch {
    pub origin_iata: String,
    pub destination_iata: String,
    /// Search day at 00:00 UTC.
    pub date_utc: DateTime<Utc>,
    pub arrive_not_later_utc: Option<DateTime<Utc>>,
    pub depart_not_before_utc: Option<DateTime<Utc>>,
}

/// The airfare service's view of a match, as served by the match service RPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub match_id: i64,
    pub kickoff_utc: DateTime<Utc>,
    pub destination_iata: String,
    pub tickets_link: String,
    pub home_club_id: String,
    pub away_club_id: String,
    pub city: String,
    pub stadium: String,
}

pub mod airfare;
pub mod matches;

// Re-export all models for convenient access
pub use airfare::{AirfareByMatch, Direction, FareSearch, FareSlot, MatchSnapshot, SlotKind};
pub use matches::{Club, Match, MatchId};

pub mod airfare_service;
pub mod match_service;
pub mod sync;

pub use airfare_service::{AirfareService, MatchReader};
pub use match_service::{MatchService, SyncOutcome};
pub use sync::SyncRunner;

pub mod city_iata_repository;
pub mod club_repository;
pub mod match_repository;

// Re-export all repositories for convenient access
pub use city_iata_repository::CityIataRepository;
pub use club_repository::ClubRepository;
pub use match_repository::MatchRepository;

//! Fanflight library
//!
//! Shared building blocks for the three services: match ingestion,
//! airfare pricing, and the HTTP catalog gateway.

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod fares;
pub mod football;
pub mod gateway;
pub mod grpc;
pub mod models;
pub mod repositories;
pub mod services;

// Re-export commonly used types
pub use error::{AirfareError, MatchError};

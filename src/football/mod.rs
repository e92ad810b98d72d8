//! Upstream football API: discovery of upcoming matches across tournament
//! seasons and per-match detail. The upstream speaks HTTP POST with JSON
//! bodies, irregular response envelopes, and several date layouts.

pub mod client;
pub mod dto;
pub mod mapper;
pub mod source;

pub use client::FootballClient;
pub use source::FootballSource;

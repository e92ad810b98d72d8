//! gRPC plumbing: generated proto code, server implementations, and thin
//! clients with per-call timeouts.

pub mod airfare_client;
pub mod airfare_server;
pub mod match_client;
pub mod match_server;

pub use airfare_client::AirfareClient;
pub use airfare_server::AirfareGrpcService;
pub use match_client::{GrpcMatchReader, MatchClient};
pub use match_server::MatchGrpcService;

use chrono::{DateTime, TimeZone, Utc};

// Generated proto code
pub mod matchv1 {
    tonic::include_proto!("match.v1");
}

pub mod airfarev1 {
    tonic::include_proto!("airfare.v1");
}

/// File descriptor set for gRPC reflection.
pub const FILE_DESCRIPTOR_SET: &[u8] =
    include_bytes!(concat!(env!("OUT_DIR"), "/fanflight_descriptor.bin"));

pub fn to_proto_timestamp(dt: DateTime<Utc>) -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: dt.timestamp(),
        nanos: dt.timestamp_subsec_nanos() as i32,
    }
}

pub fn from_proto_timestamp(ts: &prost_types::Timestamp) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(ts.seconds, ts.nanos.max(0) as u32).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_round_trips() {
        let dt = Utc.with_ymd_and_hms(2026, 2, 27, 19, 30, 0).unwrap();
        let ts = to_proto_timestamp(dt);
        assert_eq!(from_proto_timestamp(&ts), Some(dt));
    }
}

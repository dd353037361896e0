//! Metric helpers for `framecast`.
//!
//! This module defines metric names and simple helper functions wrapping
//! the [`metrics`](https://docs.rs/metrics) crate. With the `metrics`
//! feature disabled the helpers compile to no-ops so call sites stay
//! unconditional.

#[cfg(feature = "metrics")]
use metrics::counter;

/// Name of the counter tracking processed chunks, labelled by direction.
pub const CHUNKS_PROCESSED: &str = "framecast_chunks_processed_total";
/// Name of the counter tracking completed frames.
pub const FRAMES_COMPLETED: &str = "framecast_frames_completed_total";
/// Name of the counter tracking evicted partial frames.
pub const FRAMES_EVICTED: &str = "framecast_frames_evicted_total";
/// Name of the counter tracking dropped malformed packets.
pub const PACKETS_MALFORMED: &str = "framecast_packets_malformed_total";
/// Name of the counter tracking observed sequence gaps.
pub const SEQUENCE_GAPS: &str = "framecast_sequence_gaps_total";

/// Direction of chunk processing.
#[derive(Clone, Copy)]
pub enum Direction {
    /// Inbound chunks received from the peer.
    Inbound,
    /// Outbound chunks handed to the transport.
    Outbound,
}

impl Direction {
    #[cfg(feature = "metrics")]
    fn as_str(self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

/// Record a processed chunk for the given direction.
pub fn inc_chunks(direction: Direction) {
    #[cfg(feature = "metrics")]
    counter!(CHUNKS_PROCESSED, "direction" => direction.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = direction;
}

/// Record a completed frame delivery.
pub fn inc_frames_completed() {
    #[cfg(feature = "metrics")]
    counter!(FRAMES_COMPLETED).increment(1);
}

/// Record an evicted partial frame.
pub fn inc_frames_evicted() {
    #[cfg(feature = "metrics")]
    counter!(FRAMES_EVICTED).increment(1);
}

/// Record a dropped malformed packet.
pub fn inc_malformed() {
    #[cfg(feature = "metrics")]
    counter!(PACKETS_MALFORMED).increment(1);
}

/// Record a detected sequence gap.
pub fn inc_sequence_gaps() {
    #[cfg(feature = "metrics")]
    counter!(SEQUENCE_GAPS).increment(1);
}

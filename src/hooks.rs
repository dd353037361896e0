//! Injected capabilities a session is constructed with.
//!
//! The framing core never touches sockets, clocks, or rate estimators. The
//! surrounding call layer supplies a [`PacketTransport`] to carry wire
//! packets, a [`CongestionFeedback`] sink for loss statistics, and a frame
//! consumer closure that takes ownership of completed frames. All three run
//! synchronously inside the session's packet dispatch.

use thiserror::Error;

use crate::frame::{CompletedFrame, FrameClass};

/// Failure reported by the transport for a single wire packet.
///
/// Chunk sends are independent: a failed chunk never aborts the remaining
/// chunks of the same frame.
#[derive(Debug, Error)]
#[error("transport refused packet: {reason}")]
pub struct TransportSendError {
    reason: String,
}

impl TransportSendError {
    /// Describe why the transport refused the packet.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The transport's stated reason.
    #[must_use]
    pub fn reason(&self) -> &str { &self.reason }
}

/// Outbound side of the already-encrypted datagram channel.
pub trait PacketTransport {
    /// Hand one opaque wire packet to the channel.
    ///
    /// # Errors
    ///
    /// Returns [`TransportSendError`] when the channel cannot carry the
    /// packet; the caller records the failure and continues with the next
    /// chunk.
    fn send_packet(&mut self, packet: &[u8]) -> Result<(), TransportSendError>;
}

/// Sink for receive-side statistics feeding bit-rate adaptation.
///
/// Every method defaults to a no-op so estimators implement only the
/// signals they consume.
pub trait CongestionFeedback {
    /// A chunk was applied to a frame; `bytes` payload bytes were newly
    /// covered.
    fn on_chunk_accepted(&mut self, bytes: u32, class: FrameClass) {
        let _ = (bytes, class);
    }

    /// A chunk arrived again; its `bytes` were already covered.
    fn on_chunk_duplicate(&mut self, bytes: u32, class: FrameClass) {
        let _ = (bytes, class);
    }

    /// A sequence discontinuity spanning `missing_frames` whole frames was
    /// observed. Suppressed during the session's startup window.
    fn on_sequence_gap(&mut self, missing_frames: u16, class: FrameClass) {
        let _ = (missing_frames, class);
    }

    /// An inbound packet failed validation and was dropped.
    fn on_malformed_packet(&mut self) {}

    /// A partial frame was abandoned (slot evicted); `buffered_bytes` had
    /// already been received and are now wasted.
    fn on_frame_abandoned(&mut self, buffered_bytes: u32, class: FrameClass) {
        let _ = (buffered_bytes, class);
    }
}

/// Callback owning each completed frame.
///
/// Invoked exactly once per reassembled frame, inline with packet dispatch;
/// implementations must not block.
pub type FrameConsumer = Box<dyn FnMut(CompletedFrame)>;

//! Per-(peer, media-type) session owning the engines and the pool.
//!
//! A session is created when a call starts carrying a media type and
//! dropped when that direction ends. It moves through three externally
//! driven states: created (not yet receiving), receiving, and stopped;
//! the engines never change the receiving state themselves. All access is
//! single-threaded: the surrounding event loop serialises every call, so
//! the session takes no locks. Concurrent sessions for different peers or
//! media types are fully independent.

pub mod error;

pub use error::SessionError;

use std::num::NonZeroUsize;

use derive_more::{Display, From, Into};
use tracing::{debug, trace};

use crate::{
    header::{NO_FRAGMENT, PayloadKind},
    hooks::{CongestionFeedback, FrameConsumer, PacketTransport},
    metrics,
    pool::WORK_BUFFER_COUNT,
    recv::{ReceiveEngine, ReceiveStats},
    send::{ChunkSendFailure, FrameChunker, FrameTransmission, OutboundFrame, SendError},
};

/// Default transport packet ceiling, leaving headroom below common path
/// MTUs for the encrypting transport's own framing.
pub const DEFAULT_MAX_PACKET_SIZE: usize = 1281;

/// Default cap on a single reassembled frame.
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 16 * 1024 * 1024;

/// Default number of startup sequence gaps dismissed before loss reports
/// reach the congestion collaborator.
pub const DEFAULT_DISMISS_FIRST_GAPS: u8 = 10;

/// Identity of the remote peer a session exchanges media with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, From, Into)]
#[display("{_0}")]
pub struct PeerId(u32);

impl PeerId {
    /// Create a peer identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self { Self(value) }

    /// Return the inner numeric identifier.
    #[must_use]
    pub const fn get(self) -> u32 { self.0 }
}

/// Construction-time settings for one session.
#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    /// Media type carried by the session.
    pub kind: PayloadKind,
    /// The remote peer.
    pub peer: PeerId,
    /// Stream source identifier stamped into outbound headers.
    pub source_id: u32,
    /// Largest wire packet the transport will carry.
    pub max_packet_size: usize,
    /// Hard cap on a single reassembled frame.
    pub max_frame_size: u32,
    /// Number of concurrent reassembly slots.
    pub work_buffers: NonZeroUsize,
    /// Startup sequence gaps to dismiss before reporting loss.
    pub dismiss_first_gaps: u8,
}

impl SessionConfig {
    /// Defaults for a session with `peer` carrying `kind`.
    #[must_use]
    pub const fn new(kind: PayloadKind, peer: PeerId) -> Self {
        Self {
            kind,
            peer,
            source_id: 0,
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            work_buffers: match NonZeroUsize::new(WORK_BUFFER_COUNT) {
                Some(count) => count,
                None => NonZeroUsize::MIN,
            },
            dismiss_first_gaps: DEFAULT_DISMISS_FIRST_GAPS,
        }
    }
}

/// Per-frame metadata supplied by the producer.
#[derive(Clone, Copy, Debug)]
pub struct FrameMeta {
    /// Capture/send time marker stamped into every chunk.
    pub timestamp: u32,
    /// Whether the frame is a key frame.
    pub is_keyframe: bool,
    /// Partition index; [`NO_FRAGMENT`] when unfragmented.
    pub fragment: i32,
    /// Relative capture time, when the producer records one.
    pub record_timestamp: Option<u64>,
    /// Whether an H.264 encoder produced the frame.
    pub encoder_h264: bool,
}

impl FrameMeta {
    /// Metadata for an unfragmented frame with no record timestamp.
    #[must_use]
    pub const fn new(is_keyframe: bool) -> Self {
        Self {
            timestamp: 0,
            is_keyframe,
            fragment: NO_FRAGMENT,
            record_timestamp: None,
            encoder_h264: false,
        }
    }
}

/// Counters for one session, merging both directions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Receive-side counters.
    pub receive: ReceiveStats,
    /// Frames handed to [`Session::send_frame`] and chunked.
    pub frames_sent: u64,
    /// Chunks the transport accepted.
    pub chunks_sent: u64,
}

/// One direction pair of media framing state for a (peer, media-type).
///
/// The session exclusively owns its pool and all in-flight buffers;
/// completed frames transfer ownership of their bytes to the consumer
/// callback.
pub struct Session {
    config: SessionConfig,
    chunker: FrameChunker,
    engine: ReceiveEngine,
    transport: Box<dyn PacketTransport>,
    congestion: Box<dyn CongestionFeedback>,
    consumer: FrameConsumer,
    sequence: u16,
    receiving: bool,
    bit_rate: u32,
    frames_sent: u64,
    chunks_sent: u64,
}

impl Session {
    /// Create a session in the non-receiving state.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::PacketSizeTooSmall`] when
    /// `config.max_packet_size` cannot fit the discriminator, the header,
    /// and at least one payload byte.
    pub fn new(
        config: SessionConfig,
        transport: Box<dyn PacketTransport>,
        congestion: Box<dyn CongestionFeedback>,
        consumer: FrameConsumer,
    ) -> Result<Self, SessionError> {
        let chunker = FrameChunker::for_packet_size(config.max_packet_size).ok_or(
            SessionError::PacketSizeTooSmall {
                max_packet_size: config.max_packet_size,
            },
        )?;
        let engine = ReceiveEngine::new(
            config.kind,
            config.work_buffers,
            config.max_frame_size,
            config.dismiss_first_gaps,
        );
        Ok(Self {
            config,
            chunker,
            engine,
            transport,
            congestion,
            consumer,
            sequence: 0,
            receiving: false,
            bit_rate: 0,
            frames_sent: 0,
            chunks_sent: 0,
        })
    }

    /// Media type carried by the session.
    #[must_use]
    pub const fn kind(&self) -> PayloadKind { self.config.kind }

    /// The remote peer.
    #[must_use]
    pub const fn peer(&self) -> PeerId { self.config.peer }

    /// Whether inbound packets are currently processed.
    #[must_use]
    pub const fn is_receiving(&self) -> bool { self.receiving }

    /// Accept inbound packets from now on.
    pub fn start_receiving(&mut self) { self.receiving = true; }

    /// Reject inbound packets from the next one onwards.
    ///
    /// In-flight partial frames are retained; later traffic evicts them
    /// naturally if receiving resumes.
    pub fn stop_receiving(&mut self) { self.receiving = false; }

    /// Record the encoder bit rate stamped into subsequent frames.
    pub fn set_encoder_bit_rate(&mut self, bit_rate: u32) { self.bit_rate = bit_rate; }

    /// Timestamp of the most recently accepted inbound chunk.
    #[must_use]
    pub const fn last_received_timestamp(&self) -> u32 { self.engine.last_timestamp() }

    /// Number of frames currently assembling in the pool.
    #[must_use]
    pub fn assembling(&self) -> usize { self.engine.assembling() }

    /// Counters for both directions.
    #[must_use]
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            receive: *self.engine.stats(),
            frames_sent: self.frames_sent,
            chunks_sent: self.chunks_sent,
        }
    }

    /// Send one frame, chunked to fit the transport.
    ///
    /// # Errors
    ///
    /// Returns [`SendError`] when the payload is empty or oversized.
    /// Transport refusals of individual chunks are not errors; they are
    /// listed in the returned [`FrameTransmission`] while the remaining
    /// chunks are still sent.
    pub fn send_frame(
        &mut self,
        payload: &[u8],
        is_keyframe: bool,
    ) -> Result<FrameTransmission, SendError> {
        self.send_frame_with(payload, FrameMeta::new(is_keyframe))
    }

    /// Send one frame with full per-frame metadata.
    ///
    /// # Errors
    ///
    /// As [`Session::send_frame`].
    pub fn send_frame_with(
        &mut self,
        payload: &[u8],
        meta: FrameMeta,
    ) -> Result<FrameTransmission, SendError> {
        let frame = OutboundFrame {
            payload,
            kind: self.config.kind,
            sequence: self.sequence,
            timestamp: meta.timestamp,
            source_id: self.config.source_id,
            is_keyframe: meta.is_keyframe,
            fragment: meta.fragment,
            record_timestamp: meta.record_timestamp,
            encoder_h264: meta.encoder_h264,
            bit_rate: self.bit_rate,
            force_large: self.config.kind.is_video(),
        };
        let chunks = self.chunker.chunk_frame(&frame)?;

        // One sequence step per frame, however many chunks it became.
        let sequence = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);

        let mut failures = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            metrics::inc_chunks(metrics::Direction::Outbound);
            match self.transport.send_packet(chunk.bytes()) {
                Ok(()) => self.chunks_sent += 1,
                Err(error) => {
                    debug!(index, offset = chunk.offset(), error = %error, "chunk send failed");
                    failures.push(ChunkSendFailure::new(
                        index,
                        chunk.offset(),
                        chunk.payload_len(),
                        error,
                    ));
                }
            }
        }
        self.frames_sent += 1;

        Ok(FrameTransmission::new(sequence, chunks.len(), failures))
    }

    /// Dispatch one inbound wire packet.
    ///
    /// Invoked by the transport for every packet matching this session's
    /// payload type and peer. Runs synchronously: at most one completed
    /// frame reaches the consumer before this returns. Packets arriving
    /// while the session is stopped are ignored.
    pub fn on_packet(&mut self, raw: &[u8]) {
        if !self.receiving {
            trace!(len = raw.len(), "ignoring packet while stopped");
            return;
        }
        match self.engine.accept(raw, self.congestion.as_mut()) {
            Ok(Some(frame)) => (self.consumer)(frame),
            Ok(None) => {}
            Err(error) => debug!(error = %error, "dropped inbound packet"),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("kind", &self.config.kind)
            .field("peer", &self.config.peer)
            .field("sequence", &self.sequence)
            .field("receiving", &self.receiving)
            .finish_non_exhaustive()
    }
}

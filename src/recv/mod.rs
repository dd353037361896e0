//! Inbound engine: routes chunks to reassembly state and emits frames.
//!
//! The engine runs synchronously inside the transport's packet dispatch:
//! one packet in, at most one completed frame out. Large-frame chunks go to
//! the work-buffer pool, everything else to the legacy accumulator; both
//! paths report every chunk outcome to the congestion collaborator.

pub mod error;
pub mod legacy;
pub mod packet;

pub use error::{MalformedPacket, ReceiveError};
pub use legacy::{LegacyAccept, LegacyAssembler};
pub use packet::InboundChunk;

use std::num::NonZeroUsize;

use tracing::{debug, trace};

use crate::{
    frame::{CompletedFrame, FrameClass},
    header::{ChunkHeader, PayloadKind},
    hooks::CongestionFeedback,
    metrics,
    pool::{FrameKey, WorkBuffer, WorkBufferPool},
};

/// Sequence distance beyond which an arrival is treated as reordered rather
/// than as a jump forward.
const HALF_SEQUENCE_RANGE: u16 = 32_768;

/// How many completed frame identities the engine remembers.
///
/// Late duplicates of a frame that already completed would otherwise open a
/// fresh slot (and, for single-chunk frames, complete a second time). A
/// short memory of delivered identities keeps the exactly-once consumer
/// contract under duplication without unbounded state.
const COMPLETED_MEMORY: usize = 8;

/// Receive-side counters, exposed through the session's statistics snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReceiveStats {
    /// Chunks that contributed new payload bytes.
    pub chunks_accepted: u64,
    /// Chunks whose bytes were already covered.
    pub chunks_duplicated: u64,
    /// Packets dropped by validation.
    pub packets_malformed: u64,
    /// Chunks refused because the declared frame exceeded the size limit.
    pub allocations_refused: u64,
    /// Frames delivered to the consumer.
    pub frames_completed: u64,
    /// Partial frames evicted from the pool.
    pub frames_evicted: u64,
    /// Legacy partial messages discarded by a restart.
    pub legacy_restarts: u64,
    /// Sequence discontinuities observed (including dismissed ones).
    pub sequence_gaps: u64,
}

/// Per-session inbound state machine.
#[derive(Debug)]
pub struct ReceiveEngine {
    kind: PayloadKind,
    pool: WorkBufferPool,
    legacy: LegacyAssembler,
    max_frame_size: u32,
    dismiss_remaining: u8,
    last_sequence: Option<u16>,
    last_timestamp: u32,
    completed: [Option<FrameKey>; COMPLETED_MEMORY],
    completed_cursor: usize,
    stats: ReceiveStats,
}

impl ReceiveEngine {
    /// Create an engine for one session.
    #[must_use]
    pub fn new(
        kind: PayloadKind,
        pool_capacity: NonZeroUsize,
        max_frame_size: u32,
        dismiss_first_gaps: u8,
    ) -> Self {
        Self {
            kind,
            pool: WorkBufferPool::new(pool_capacity),
            legacy: LegacyAssembler::new(),
            max_frame_size,
            dismiss_remaining: dismiss_first_gaps,
            last_sequence: None,
            last_timestamp: 0,
            completed: [None; COMPLETED_MEMORY],
            completed_cursor: 0,
            stats: ReceiveStats::default(),
        }
    }

    /// Receive-side counters.
    #[must_use]
    pub const fn stats(&self) -> &ReceiveStats { &self.stats }

    /// Timestamp of the most recently accepted chunk.
    #[must_use]
    pub const fn last_timestamp(&self) -> u32 { self.last_timestamp }

    /// Number of frames currently assembling in the pool.
    #[must_use]
    pub fn assembling(&self) -> usize { self.pool.assembling() }

    /// Process one inbound wire packet.
    ///
    /// Returns the completed frame when this chunk finished one. Every
    /// outcome is mirrored to `feedback`; errors mean the packet was dropped
    /// without touching reassembly state and are never fatal.
    ///
    /// # Errors
    ///
    /// [`ReceiveError::Malformed`] when validation rejected the packet,
    /// [`ReceiveError::FrameTooLarge`] when the declared frame exceeds the
    /// reassembly limit.
    pub fn accept(
        &mut self,
        raw: &[u8],
        feedback: &mut dyn CongestionFeedback,
    ) -> Result<Option<CompletedFrame>, ReceiveError> {
        let chunk = match InboundChunk::parse(self.kind, raw) {
            Ok(chunk) => chunk,
            Err(rejection) => return Err(self.reject(rejection, feedback)),
        };
        if let Err(rejection) = chunk.validate() {
            return Err(self.reject(rejection, feedback));
        }

        let header = chunk.header;
        let class = FrameClass::of(self.kind, header.is_keyframe());
        self.track_sequence(header.sequence, class, feedback);
        self.last_timestamp = header.timestamp;
        metrics::inc_chunks(metrics::Direction::Inbound);

        if header.is_large_frame() {
            self.accept_pooled(header, chunk.payload, class, feedback)
        } else {
            Ok(self.accept_legacy(&header, chunk.payload, class, feedback))
        }
    }

    fn reject(
        &mut self,
        rejection: MalformedPacket,
        feedback: &mut dyn CongestionFeedback,
    ) -> ReceiveError {
        self.stats.packets_malformed += 1;
        metrics::inc_malformed();
        feedback.on_malformed_packet();
        rejection.into()
    }

    /// Record sequence movement and report discontinuities.
    ///
    /// Chunks of the same frame share a sequence number, so a zero delta is
    /// normal; deltas in the upper half of the range are late arrivals of
    /// older frames and never count as gaps. The first few detections after
    /// session start are dismissed as expected warm-up loss.
    fn track_sequence(
        &mut self,
        sequence: u16,
        class: FrameClass,
        feedback: &mut dyn CongestionFeedback,
    ) {
        let Some(last) = self.last_sequence else {
            self.last_sequence = Some(sequence);
            return;
        };
        let delta = sequence.wrapping_sub(last);
        if delta == 0 || delta >= HALF_SEQUENCE_RANGE {
            return;
        }
        self.last_sequence = Some(sequence);

        let missing = delta - 1;
        if missing == 0 {
            return;
        }
        self.stats.sequence_gaps += 1;
        metrics::inc_sequence_gaps();
        if self.dismiss_remaining > 0 {
            self.dismiss_remaining -= 1;
            trace!(missing, "dismissing startup sequence gap");
            return;
        }
        feedback.on_sequence_gap(missing, class);
    }

    fn accept_pooled(
        &mut self,
        header: ChunkHeader,
        payload: &[u8],
        class: FrameClass,
        feedback: &mut dyn CongestionFeedback,
    ) -> Result<Option<CompletedFrame>, ReceiveError> {
        let key = FrameKey::of(&header);
        if self.recently_completed(&key) {
            self.report_absorption(0, payload.len(), class, feedback);
            return Ok(None);
        }
        let index = if let Some(index) = self.pool.position(&key) {
            index
        } else {
            if header.length_full > self.max_frame_size {
                self.stats.allocations_refused += 1;
                feedback.on_malformed_packet();
                debug!(
                    declared = header.length_full,
                    limit = self.max_frame_size,
                    "refusing oversized frame"
                );
                return Err(ReceiveError::FrameTooLarge {
                    declared: header.length_full,
                    limit: self.max_frame_size,
                });
            }
            let (index, evicted) = self.pool.admit(WorkBuffer::new(header));
            if let Some(evicted) = evicted {
                self.stats.frames_evicted += 1;
                metrics::inc_frames_evicted();
                debug!(
                    sequence = evicted.key().sequence,
                    buffered = evicted.received_len(),
                    "evicting stalled frame to make room"
                );
                feedback.on_frame_abandoned(
                    evicted.received_len(),
                    FrameClass::of(self.kind, evicted.is_keyframe()),
                );
            }
            index
        };

        let Some(slot) = self.pool.slot_mut(index) else {
            return Ok(None);
        };
        let newly = slot.absorb(header.offset_full, payload);
        let complete = slot.is_complete();
        self.report_absorption(newly, payload.len(), class, feedback);

        if complete {
            let Some(buffer) = self.pool.release(index) else {
                return Ok(None);
            };
            self.remember_completed(key);
            self.stats.frames_completed += 1;
            metrics::inc_frames_completed();
            return Ok(Some(buffer.into_completed()));
        }
        Ok(None)
    }

    fn accept_legacy(
        &mut self,
        header: &ChunkHeader,
        payload: &[u8],
        class: FrameClass,
        feedback: &mut dyn CongestionFeedback,
    ) -> Option<CompletedFrame> {
        let key = FrameKey {
            sequence: header.sequence,
            timestamp: header.timestamp,
            length: u32::from(header.length_lower),
        };
        if self.recently_completed(&key) {
            self.report_absorption(0, payload.len(), class, feedback);
            return None;
        }

        let LegacyAccept {
            newly_covered,
            completed,
            abandoned,
        } = self.legacy.accept(header, payload);

        if let Some(buffered) = abandoned {
            self.stats.legacy_restarts += 1;
            feedback.on_frame_abandoned(buffered, class);
        }
        self.report_absorption(newly_covered, payload.len(), class, feedback);

        if completed.is_some() {
            self.remember_completed(key);
            self.stats.frames_completed += 1;
            metrics::inc_frames_completed();
        }
        completed
    }

    fn recently_completed(&self, key: &FrameKey) -> bool {
        self.completed.iter().flatten().any(|seen| seen == key)
    }

    fn remember_completed(&mut self, key: FrameKey) {
        if let Some(slot) = self.completed.get_mut(self.completed_cursor) {
            *slot = Some(key);
        }
        self.completed_cursor = (self.completed_cursor + 1) % COMPLETED_MEMORY;
    }

    fn report_absorption(
        &mut self,
        newly: u32,
        payload_len: usize,
        class: FrameClass,
        feedback: &mut dyn CongestionFeedback,
    ) {
        if newly == 0 {
            self.stats.chunks_duplicated += 1;
            #[expect(
                clippy::cast_possible_truncation,
                reason = "chunk payloads are bounded by the frame length, which is u32"
            )]
            feedback.on_chunk_duplicate(payload_len as u32, class);
        } else {
            self.stats.chunks_accepted += 1;
            feedback.on_chunk_accepted(newly, class);
        }
    }
}

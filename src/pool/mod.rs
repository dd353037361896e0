//! Fixed-capacity arena of frame reassembly slots.
//!
//! A session assembles at most [`WORK_BUFFER_COUNT`] frames concurrently.
//! When every slot is busy and a chunk of a new frame arrives, the pool
//! evicts by keyframe-aware LRU: the oldest non-keyframe slot goes first,
//! and a keyframe slot is sacrificed only when nothing else remains.

pub mod coverage;

pub use coverage::ByteCoverage;

use std::num::NonZeroUsize;

use bytes::BytesMut;

use crate::{frame::CompletedFrame, header::ChunkHeader};

/// Number of frames one session may assemble concurrently.
pub const WORK_BUFFER_COUNT: usize = 3;

/// Identity of the frame a chunk belongs to.
///
/// Chunks carry no explicit frame id; the sequence number, capture
/// timestamp, and total length together correlate a chunk with its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameKey {
    /// Per-frame sequence number.
    pub sequence: u16,
    /// Capture/send time marker.
    pub timestamp: u32,
    /// Total frame length in bytes.
    pub length: u32,
}

impl FrameKey {
    /// Extract the correlation key from a chunk header.
    #[must_use]
    pub const fn of(header: &ChunkHeader) -> Self {
        Self {
            sequence: header.sequence,
            timestamp: header.timestamp,
            length: header.length_full,
        }
    }
}

/// One reassembly slot: the partial bytes of a single in-progress frame.
#[derive(Debug)]
pub struct WorkBuffer {
    key: FrameKey,
    header: ChunkHeader,
    is_keyframe: bool,
    received_len: u32,
    coverage: ByteCoverage,
    buffer: BytesMut,
    admitted: u64,
}

impl WorkBuffer {
    /// Reserve storage for a frame of `header.length_full` bytes.
    #[must_use]
    pub fn new(header: ChunkHeader) -> Self {
        Self {
            key: FrameKey::of(&header),
            is_keyframe: header.is_keyframe(),
            buffer: BytesMut::zeroed(header.length_full as usize),
            header,
            received_len: 0,
            coverage: ByteCoverage::new(),
            admitted: 0,
        }
    }

    /// The correlation key of the frame being assembled.
    #[must_use]
    pub const fn key(&self) -> &FrameKey { &self.key }

    /// Whether the slot holds a key frame.
    #[must_use]
    pub const fn is_keyframe(&self) -> bool { self.is_keyframe }

    /// Cumulative distinct bytes received.
    #[must_use]
    pub const fn received_len(&self) -> u32 { self.received_len }

    /// Copy a chunk's payload into place.
    ///
    /// Returns the number of bytes covered for the first time; duplicates and
    /// overlaps contribute only their unseen portion. Offsets beyond the
    /// frame are ignored — the receive engine validates bounds before
    /// routing a chunk here.
    pub fn absorb(&mut self, offset: u32, payload: &[u8]) -> u32 {
        let start = offset as usize;
        let Some(end) = start.checked_add(payload.len()) else {
            return 0;
        };
        let Some(dst) = self.buffer.get_mut(start..end) else {
            return 0;
        };
        dst.copy_from_slice(payload);

        #[expect(
            clippy::cast_possible_truncation,
            reason = "chunk payloads are bounded by the frame length, which is u32"
        )]
        let newly = self.coverage.insert(offset, payload.len() as u32);
        self.received_len += newly;
        self.header.received_full = self.received_len;
        newly
    }

    /// Whether every byte of the frame has arrived at least once.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.received_len == self.key.length && self.coverage.covers_exactly(self.key.length)
    }

    /// Consume the slot, yielding the assembled frame.
    #[must_use]
    pub fn into_completed(self) -> CompletedFrame {
        CompletedFrame::new(self.buffer.freeze(), &self.header)
    }
}

/// Which slot a new frame should occupy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SlotChoice {
    /// An unoccupied slot.
    Free(usize),
    /// The eviction victim chosen by the keyframe-aware LRU policy.
    Evict(usize),
}

/// The arena of reassembly slots owned by one session.
#[derive(Debug)]
pub struct WorkBufferPool {
    slots: Vec<Option<WorkBuffer>>,
    admissions: u64,
}

impl WorkBufferPool {
    /// Create a pool with `capacity` slots.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        let mut slots = Vec::with_capacity(capacity.get());
        slots.resize_with(capacity.get(), || None);
        Self {
            slots,
            admissions: 0,
        }
    }

    /// Number of slots in the arena.
    #[must_use]
    pub fn capacity(&self) -> usize { self.slots.len() }

    /// Number of frames currently assembling.
    #[must_use]
    pub fn assembling(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Index of the slot assembling the frame identified by `key`.
    #[must_use]
    pub fn position(&self, key: &FrameKey) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|wb| wb.key() == key))
    }

    /// Mutable access to an occupied slot.
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut WorkBuffer> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Place a new frame into the arena.
    ///
    /// Prefers a free slot; otherwise evicts per the keyframe-aware LRU
    /// policy and returns the discarded partial frame so its buffered bytes
    /// can be reported as lost.
    pub fn admit(&mut self, mut buffer: WorkBuffer) -> (usize, Option<WorkBuffer>) {
        self.admissions += 1;
        buffer.admitted = self.admissions;

        let (index, evicted) = match self.choose_slot() {
            SlotChoice::Free(index) => (index, None),
            SlotChoice::Evict(index) => {
                let evicted = self.slots.get_mut(index).and_then(Option::take);
                (index, evicted)
            }
        };
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(buffer);
        }
        (index, evicted)
    }

    /// Free a slot, returning the frame it held.
    pub fn release(&mut self, index: usize) -> Option<WorkBuffer> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Allocation/eviction policy: first free slot, else the oldest
    /// non-keyframe slot, else the oldest slot overall.
    fn choose_slot(&self) -> SlotChoice {
        if let Some(free) = self.slots.iter().position(Option::is_none) {
            return SlotChoice::Free(free);
        }

        let occupied = |keyframes: bool| {
            self.slots
                .iter()
                .enumerate()
                .filter_map(|(index, slot)| slot.as_ref().map(|wb| (index, wb)))
                .filter(move |(_, wb)| wb.is_keyframe() == keyframes)
                .min_by_key(|(_, wb)| wb.admitted)
                .map(|(index, _)| index)
        };

        // A full pool always yields a victim; index 0 is unreachable filler.
        SlotChoice::Evict(occupied(false).or_else(|| occupied(true)).unwrap_or(0))
    }
}

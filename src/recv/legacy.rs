//! Legacy small-frame accumulator.
//!
//! Frames within the 16-bit range travel without the large-frame flag and
//! are assembled here rather than in the work-buffer pool. The legacy path
//! deliberately supports a single in-progress message: a chunk carrying a
//! different sequence number discards the current partial and starts over.
//! It is kept separate from the pool on purpose — merging the two would
//! hide this much weaker capacity guarantee.

use bytes::BytesMut;

use crate::{
    frame::CompletedFrame,
    header::ChunkHeader,
    pool::ByteCoverage,
};

/// Result of feeding one legacy chunk into the accumulator.
#[derive(Debug)]
pub struct LegacyAccept {
    /// Payload bytes covered for the first time; zero for duplicates.
    pub newly_covered: u32,
    /// The finished frame, when this chunk completed it.
    pub completed: Option<CompletedFrame>,
    /// Bytes of a previous partial message discarded by a restart.
    pub abandoned: Option<u32>,
}

#[derive(Debug)]
struct LegacyAssembly {
    header: ChunkHeader,
    buffer: BytesMut,
    coverage: ByteCoverage,
    received: u32,
}

impl LegacyAssembly {
    fn new(header: ChunkHeader) -> Self {
        Self {
            buffer: BytesMut::zeroed(usize::from(header.length_lower)),
            header,
            coverage: ByteCoverage::new(),
            received: 0,
        }
    }

    fn total(&self) -> u32 { u32::from(self.header.length_lower) }

    fn absorb(&mut self, offset: u16, payload: &[u8]) -> u32 {
        let start = usize::from(offset);
        let Some(end) = start.checked_add(payload.len()) else {
            return 0;
        };
        let Some(dst) = self.buffer.get_mut(start..end) else {
            return 0;
        };
        dst.copy_from_slice(payload);

        #[expect(
            clippy::cast_possible_truncation,
            reason = "legacy payloads are bounded by the 16-bit length field"
        )]
        let newly = self.coverage.insert(u32::from(offset), payload.len() as u32);
        self.received += newly;
        self.header.received_full = self.received;
        newly
    }

    fn is_complete(&self) -> bool {
        self.received == self.total() && self.coverage.covers_exactly(self.total())
    }

    fn into_completed(self) -> CompletedFrame {
        CompletedFrame::new(self.buffer.freeze(), &self.header)
    }
}

/// Single-message assembler for small, non-large-frame chunks.
#[derive(Debug, Default)]
pub struct LegacyAssembler {
    current: Option<LegacyAssembly>,
}

impl LegacyAssembler {
    /// Create an idle accumulator.
    #[must_use]
    pub const fn new() -> Self { Self { current: None } }

    /// Whether a partial message is buffered.
    #[must_use]
    pub const fn in_progress(&self) -> bool { self.current.is_some() }

    /// Feed one validated legacy chunk.
    ///
    /// A chunk whose sequence number differs from the in-progress message
    /// resets the accumulator and begins assembling the new message.
    pub fn accept(&mut self, header: &ChunkHeader, payload: &[u8]) -> LegacyAccept {
        let mut abandoned = None;

        let restart = !matches!(
            &self.current,
            Some(assembly) if assembly.header.sequence == header.sequence
        );
        if restart {
            abandoned = self
                .current
                .take()
                .map(|assembly| assembly.received)
                .filter(|&received| received > 0);
            self.current = Some(LegacyAssembly::new(*header));
        }

        let Some(assembly) = self.current.as_mut() else {
            // `restart` always re-populates `current`.
            return LegacyAccept {
                newly_covered: 0,
                completed: None,
                abandoned,
            };
        };

        let newly_covered = assembly.absorb(header.offset_lower, payload);
        let completed = if assembly.is_complete() {
            self.current.take().map(LegacyAssembly::into_completed)
        } else {
            None
        };

        LegacyAccept {
            newly_covered,
            completed,
            abandoned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LegacyAssembler;
    use crate::header::{ChunkHeader, HeaderFlags, NO_FRAGMENT, PayloadKind};

    fn header(sequence: u16, offset: u16, total: u16) -> ChunkHeader {
        ChunkHeader {
            version: 2,
            padding: false,
            keyframe: false,
            csrc_count: 0,
            marker: false,
            payload_type: PayloadKind::Audio.header_payload_type(),
            sequence,
            timestamp: 0,
            source_id: 0,
            flags: HeaderFlags::empty(),
            offset_full: 0,
            length_full: 0,
            received_full: 0,
            record_timestamp: 0,
            fragment: NO_FRAGMENT,
            real_frame: 0,
            bit_rate: 0,
            offset_lower: offset,
            length_lower: total,
        }
    }

    #[test]
    fn single_chunk_message_completes_without_buffering() {
        let mut assembler = LegacyAssembler::new();
        let accept = assembler.accept(&header(1, 0, 4), b"ping");

        assert_eq!(accept.newly_covered, 4);
        assert_eq!(accept.abandoned, None);
        let frame = accept.completed.expect("single chunk completes");
        assert_eq!(frame.payload(), b"ping");
        assert!(!assembler.in_progress());
    }

    #[test]
    fn partial_message_stays_buffered() {
        let mut assembler = LegacyAssembler::new();
        let accept = assembler.accept(&header(1, 0, 8), b"ping");

        assert!(accept.completed.is_none());
        assert!(assembler.in_progress());
    }

    #[test]
    fn sequence_change_abandons_the_partial() {
        let mut assembler = LegacyAssembler::new();
        assert!(assembler.accept(&header(1, 0, 8), b"ping").completed.is_none());

        let accept = assembler.accept(&header(2, 0, 4), b"pong");
        assert_eq!(accept.abandoned, Some(4));
        assert!(accept.completed.is_some());
    }

    #[test]
    fn duplicate_chunk_reports_zero_new_bytes() {
        let mut assembler = LegacyAssembler::new();
        assembler.accept(&header(1, 0, 8), b"ping");
        let accept = assembler.accept(&header(1, 0, 8), b"ping");

        assert_eq!(accept.newly_covered, 0);
        assert!(accept.completed.is_none(), "duplicate must not complete");
    }
}

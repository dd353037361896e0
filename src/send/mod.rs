//! Outbound engine: splits a frame into header-prefixed wire chunks.
//!
//! The chunker is a pure function of the frame and the session counters
//! captured in [`OutboundFrame`]; dispatching the produced packets (and
//! collecting per-chunk transport failures) is the session's job.

pub mod error;

pub use error::SendError;

use std::num::NonZeroUsize;

use crate::{
    header::{ChunkHeader, FORMAT_VERSION, HEADER_SIZE, HeaderFlags, PayloadKind, pack},
    hooks::TransportSendError,
};

/// One outbound frame plus the per-session values stamped into its headers.
#[derive(Clone, Copy, Debug)]
pub struct OutboundFrame<'a> {
    /// The frame's payload bytes.
    pub payload: &'a [u8],
    /// Media type of the owning session.
    pub kind: PayloadKind,
    /// Sequence number assigned to this frame (shared by all its chunks).
    pub sequence: u16,
    /// Capture/send time marker.
    pub timestamp: u32,
    /// Stream source identifier.
    pub source_id: u32,
    /// Whether the frame is a key frame.
    pub is_keyframe: bool,
    /// Partition index, [`NO_FRAGMENT`](crate::header::NO_FRAGMENT) when
    /// unfragmented.
    pub fragment: i32,
    /// Relative capture time; sets the record-timestamp flag when present.
    pub record_timestamp: Option<u64>,
    /// Whether the frame was produced by an H.264 encoder.
    pub encoder_h264: bool,
    /// Bit rate the encoder used, replicated into every chunk so the
    /// receiver learns it even when only one chunk survives.
    pub bit_rate: u32,
    /// Force large-frame mode regardless of payload size. Video sessions
    /// force it so the receiver always routes their chunks to the pool.
    pub force_large: bool,
}

/// A single wire packet carrying one chunk of a frame.
#[derive(Clone, Debug)]
pub struct WireChunk {
    header: ChunkHeader,
    bytes: Vec<u8>,
}

impl WireChunk {
    /// Header stamped into this chunk.
    #[must_use]
    pub const fn header(&self) -> &ChunkHeader { &self.header }

    /// Byte offset of the chunk within the frame.
    #[must_use]
    pub const fn offset(&self) -> u32 { self.header.offset_full }

    /// Payload bytes carried by the chunk.
    #[must_use]
    pub fn payload_len(&self) -> u32 {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "chunk payloads are bounded by the frame length, which is u32"
        )]
        let len = (self.bytes.len() - 1 - HEADER_SIZE) as u32;
        len
    }

    /// The complete wire packet: discriminator, header, payload.
    #[must_use]
    pub fn bytes(&self) -> &[u8] { &self.bytes }

    /// Consume the chunk, returning the wire packet.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> { self.bytes }
}

/// Splits frames into chunks sized for the transport.
#[derive(Clone, Copy, Debug)]
pub struct FrameChunker {
    budget: NonZeroUsize,
}

impl FrameChunker {
    /// Derive a chunker from the transport's maximum packet size.
    ///
    /// The per-chunk payload budget is the packet size minus the one-byte
    /// discriminator and the fixed header. Returns `None` when the packet
    /// size cannot fit any payload at all.
    #[must_use]
    pub fn for_packet_size(max_packet_size: usize) -> Option<Self> {
        let budget = max_packet_size.checked_sub(HEADER_SIZE + 1)?;
        NonZeroUsize::new(budget).map(|budget| Self { budget })
    }

    /// Maximum payload bytes per chunk.
    #[must_use]
    pub const fn chunk_budget(&self) -> NonZeroUsize { self.budget }

    /// Split `frame` into wire chunks.
    ///
    /// Concatenating the chunk payloads by ascending offset reproduces the
    /// frame exactly. A frame that fits one packet and stays within the
    /// legacy 16-bit range is sent as a single small-frame chunk unless
    /// large-frame mode is forced; anything bigger sets
    /// [`HeaderFlags::LARGE_FRAME`] and relies on the 32-bit fields —
    /// values are never truncated into the 16-bit fields.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::EmptyFrame`] for zero-length payloads and
    /// [`SendError::FrameTooLarge`] when the length does not fit the wire
    /// format's 32-bit length field.
    pub fn chunk_frame(&self, frame: &OutboundFrame<'_>) -> Result<Vec<WireChunk>, SendError> {
        if frame.payload.is_empty() {
            return Err(SendError::EmptyFrame);
        }
        let total = u32::try_from(frame.payload.len()).map_err(|_| SendError::FrameTooLarge {
            len: frame.payload.len(),
        })?;

        let budget = u32::try_from(self.budget.get()).unwrap_or(u32::MAX);
        let large =
            frame.force_large || total > budget || frame.payload.len() > usize::from(u16::MAX);

        let flags = HeaderFlags::empty()
            .with_if(HeaderFlags::LARGE_FRAME, large)
            .with_if(HeaderFlags::KEY_FRAME, frame.is_keyframe)
            .with_if(HeaderFlags::ENCODER_H264, frame.encoder_h264)
            .with_if(HeaderFlags::RECORD_TIMESTAMP, frame.record_timestamp.is_some());

        let mut chunks = Vec::with_capacity(total.div_ceil(budget) as usize);
        let mut offset: u32 = 0;
        while offset < total {
            let len = budget.min(total - offset);
            let header = ChunkHeader {
                version: FORMAT_VERSION,
                padding: false,
                keyframe: frame.is_keyframe,
                csrc_count: 0,
                marker: false,
                payload_type: frame.kind.header_payload_type(),
                sequence: frame.sequence,
                timestamp: frame.timestamp,
                source_id: frame.source_id,
                flags,
                offset_full: offset,
                length_full: total,
                received_full: 0,
                record_timestamp: frame.record_timestamp.unwrap_or(0),
                fragment: frame.fragment,
                real_frame: 0,
                bit_rate: frame.bit_rate,
                offset_lower: low16(offset),
                length_lower: low16(total),
            };

            let start = offset as usize;
            let end = start + len as usize;
            let mut bytes = Vec::with_capacity(1 + HEADER_SIZE + len as usize);
            bytes.push(frame.kind.discriminator());
            bytes.extend_from_slice(&pack(&header));
            bytes.extend_from_slice(frame.payload.get(start..end).unwrap_or_default());

            chunks.push(WireChunk { header, bytes });
            offset += len;
        }

        Ok(chunks)
    }
}

/// Report returned by a frame send: which chunks went out and which the
/// transport refused.
#[derive(Debug)]
pub struct FrameTransmission {
    sequence: u16,
    chunks: usize,
    failures: Vec<ChunkSendFailure>,
}

impl FrameTransmission {
    pub(crate) fn new(sequence: u16, chunks: usize, failures: Vec<ChunkSendFailure>) -> Self {
        Self {
            sequence,
            chunks,
            failures,
        }
    }

    /// Sequence number the frame was sent under.
    #[must_use]
    pub const fn sequence(&self) -> u16 { self.sequence }

    /// Number of chunks the frame was split into.
    #[must_use]
    pub const fn chunks(&self) -> usize { self.chunks }

    /// Chunks the transport refused, in send order.
    #[must_use]
    pub fn failures(&self) -> &[ChunkSendFailure] { &self.failures }

    /// Whether every chunk reached the transport.
    #[must_use]
    pub fn is_complete(&self) -> bool { self.failures.is_empty() }
}

/// One chunk the transport refused to carry.
#[derive(Debug)]
pub struct ChunkSendFailure {
    index: usize,
    offset: u32,
    len: u32,
    error: TransportSendError,
}

impl ChunkSendFailure {
    pub(crate) const fn new(index: usize, offset: u32, len: u32, error: TransportSendError) -> Self {
        Self {
            index,
            offset,
            len,
            error,
        }
    }

    /// Position of the chunk within the frame's send order.
    #[must_use]
    pub const fn index(&self) -> usize { self.index }

    /// Byte offset of the lost chunk within the frame.
    #[must_use]
    pub const fn offset(&self) -> u32 { self.offset }

    /// Payload bytes the lost chunk carried.
    #[must_use]
    pub const fn len(&self) -> u32 { self.len }

    /// The transport's failure.
    #[must_use]
    pub const fn error(&self) -> &TransportSendError { &self.error }
}

/// Low 16 bits of a wire offset or length, as carried by the legacy fields.
pub(crate) fn low16(value: u32) -> u16 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the legacy fields carry the low 16 bits by definition"
    )]
    let low = (value & 0xffff) as u16;
    low
}

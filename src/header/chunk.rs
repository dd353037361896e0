//! The chunk header carried by every wire packet.

use super::HeaderFlags;

/// Fragment number signalling an unfragmented frame.
pub const NO_FRAGMENT: i32 = -1;

/// Header prefixed to every chunk of a frame.
///
/// Every multi-byte field is network byte order on the wire; the serialised
/// form is exactly [`HEADER_SIZE`](super::HEADER_SIZE) bytes (the byte map is
/// documented on the [`header`](crate::header) module). The same sequence
/// number is shared by all chunks of one frame; offset and per-chunk length
/// vary per chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Format version, two bits on the wire.
    pub version: u8,
    /// Reserved padding indicator.
    pub padding: bool,
    /// Whether this chunk belongs to a key frame. The authoritative keyframe
    /// signal is [`HeaderFlags::KEY_FRAME`]; this bit mirrors it for the
    /// benefit of byte-level inspection tools.
    pub keyframe: bool,
    /// Contributing-source count, four bits, reserved and unused.
    pub csrc_count: u8,
    /// Reserved marker bit.
    pub marker: bool,
    /// Seven-bit payload type (low bits of the wire discriminator).
    pub payload_type: u8,
    /// Per-frame sequence number; wraps at 65536.
    pub sequence: u16,
    /// Capture/send time marker.
    pub timestamp: u32,
    /// Stream source identifier.
    pub source_id: u32,
    /// Feature bit mask, see [`HeaderFlags`].
    pub flags: HeaderFlags,
    /// Byte offset of this chunk within the full frame. Meaningful when
    /// [`HeaderFlags::LARGE_FRAME`] is set.
    pub offset_full: u32,
    /// Total byte length of the frame being assembled.
    pub length_full: u32,
    /// Receiver-local bookkeeping; echoed on the wire without sender-side
    /// semantics.
    pub received_full: u32,
    /// Relative capture time of the frame. Meaningful when
    /// [`HeaderFlags::RECORD_TIMESTAMP`] is set.
    pub record_timestamp: u64,
    /// Partition index when the frame is split into independently decodable
    /// fragments; [`NO_FRAGMENT`] when unfragmented.
    pub fragment: i32,
    /// Reserved frame counter.
    pub real_frame: u32,
    /// Bit rate the encoder used for this frame, informational.
    pub bit_rate: u32,
    /// Low 16 bits of the chunk offset, legacy/small-frame path.
    pub offset_lower: u16,
    /// Low 16 bits of the total frame length, legacy path.
    pub length_lower: u16,
}

impl ChunkHeader {
    /// Whether the 32-bit offset/length fields are authoritative.
    #[must_use]
    pub const fn is_large_frame(&self) -> bool { self.flags.contains(HeaderFlags::LARGE_FRAME) }

    /// Whether the chunk belongs to a key frame.
    #[must_use]
    pub const fn is_keyframe(&self) -> bool { self.flags.contains(HeaderFlags::KEY_FRAME) }
}

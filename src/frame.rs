//! Completed frames and the classification attached to feedback reports.

use bytes::Bytes;

use crate::header::{ChunkHeader, HeaderFlags, PayloadKind};

/// Loss-weighting class of a frame.
///
/// Key frames are reported separately because losing one costs every
/// dependent delta frame until the next key frame arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameClass {
    /// An audio frame.
    Audio,
    /// A video frame decodable only against prior frames.
    VideoDelta,
    /// A video frame decodable on its own.
    VideoKey,
}

impl FrameClass {
    /// Classify a frame from its media type and keyframe flag.
    #[must_use]
    pub const fn of(kind: PayloadKind, keyframe: bool) -> Self {
        match (kind, keyframe) {
            (PayloadKind::Audio, _) => Self::Audio,
            (PayloadKind::Video, false) => Self::VideoDelta,
            (PayloadKind::Video, true) => Self::VideoKey,
        }
    }

    /// Whether this class denotes a key frame.
    #[must_use]
    pub const fn is_keyframe(self) -> bool { matches!(self, Self::VideoKey) }
}

/// A fully reassembled frame, handed to the consumer callback exactly once.
///
/// Ownership of the payload bytes transfers with the frame; the session keeps
/// no copy after delivery.
#[derive(Clone, Debug)]
pub struct CompletedFrame {
    payload: Bytes,
    is_keyframe: bool,
    sequence: u16,
    timestamp: u32,
    record_timestamp: Option<u64>,
    bit_rate: u32,
    fragment: i32,
}

impl CompletedFrame {
    /// Assemble the consumer-facing frame from reassembled bytes and the
    /// header metadata of its chunks.
    #[must_use]
    pub fn new(payload: Bytes, header: &ChunkHeader) -> Self {
        let record_timestamp = header
            .flags
            .contains(HeaderFlags::RECORD_TIMESTAMP)
            .then_some(header.record_timestamp);
        Self {
            payload,
            is_keyframe: header.is_keyframe(),
            sequence: header.sequence,
            timestamp: header.timestamp,
            record_timestamp,
            bit_rate: header.bit_rate,
            fragment: header.fragment,
        }
    }

    /// The frame's payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] { &self.payload }

    /// Consume the frame, returning the owned payload.
    #[must_use]
    pub fn into_payload(self) -> Bytes { self.payload }

    /// Whether the sender marked the frame as a key frame.
    #[must_use]
    pub const fn is_keyframe(&self) -> bool { self.is_keyframe }

    /// Sequence number shared by the frame's chunks.
    #[must_use]
    pub const fn sequence(&self) -> u16 { self.sequence }

    /// Capture/send time marker from the header.
    #[must_use]
    pub const fn timestamp(&self) -> u32 { self.timestamp }

    /// Relative capture time, when the sender provided one.
    #[must_use]
    pub const fn record_timestamp(&self) -> Option<u64> { self.record_timestamp }

    /// Bit rate the encoder reported for this frame.
    #[must_use]
    pub const fn bit_rate(&self) -> u32 { self.bit_rate }

    /// Partition index, [`NO_FRAGMENT`](crate::header::NO_FRAGMENT) when the
    /// frame is unfragmented.
    #[must_use]
    pub const fn fragment(&self) -> i32 { self.fragment }
}

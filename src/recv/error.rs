//! Error types emitted by the receive engine.
//!
//! None of these is fatal to a session: malformed packets are dropped and
//! counted, oversized frames are refused without reserving a slot, and the
//! engine keeps running either way.

use thiserror::Error;

/// Why an inbound packet was rejected during validation.
///
/// Header bytes are attacker-controlled; every declared length is checked
/// against the physical packet before any chunk bytes are copied.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum MalformedPacket {
    /// The packet cannot even hold the discriminator and header.
    #[error("packet of {len} bytes is shorter than discriminator plus header")]
    TooShort { len: usize },
    /// The discriminator byte does not belong to this session.
    #[error("discriminator {found} does not match the session's {expected}")]
    Discriminator { expected: u8, found: u8 },
    /// The chunk carries no payload bytes.
    #[error("chunk carries no payload bytes")]
    EmptyChunk,
    /// The header declares a frame of zero bytes.
    #[error("frame declares zero total length")]
    ZeroFrameLength,
    /// The chunk's span does not fit inside the declared frame.
    #[error("chunk spanning offset {offset} plus {len} bytes overruns the declared frame length {total}")]
    ChunkOverrun { offset: u32, len: usize, total: u32 },
}

/// Failures surfaced by [`ReceiveEngine::accept`](crate::recv::ReceiveEngine::accept).
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ReceiveError {
    /// The packet failed validation and was dropped.
    #[error(transparent)]
    Malformed(#[from] MalformedPacket),
    /// The declared frame length exceeds the reassembly limit; the chunk is
    /// dropped and no slot is reserved.
    #[error("frame of {declared} bytes exceeds the {limit}-byte reassembly limit")]
    FrameTooLarge { declared: u32, limit: u32 },
}

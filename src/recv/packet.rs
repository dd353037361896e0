//! Structural parsing and validation of inbound wire packets.

use super::error::MalformedPacket;
use crate::header::{ChunkHeader, HEADER_SIZE, PayloadKind, unpack};

/// A parsed inbound packet: the chunk header plus a borrowed payload view.
#[derive(Debug)]
pub struct InboundChunk<'a> {
    /// The deserialised chunk header.
    pub header: ChunkHeader,
    /// The chunk's share of the frame payload.
    pub payload: &'a [u8],
}

impl<'a> InboundChunk<'a> {
    /// Split a raw packet into discriminator, header, and payload.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedPacket`] when the packet is shorter than the fixed
    /// prefix or carries a discriminator for a different media type.
    pub fn parse(kind: PayloadKind, raw: &'a [u8]) -> Result<Self, MalformedPacket> {
        let Some((&discriminator, rest)) = raw.split_first() else {
            return Err(MalformedPacket::TooShort { len: raw.len() });
        };
        if rest.len() < HEADER_SIZE {
            return Err(MalformedPacket::TooShort { len: raw.len() });
        }
        if discriminator != kind.discriminator() {
            return Err(MalformedPacket::Discriminator {
                expected: kind.discriminator(),
                found: discriminator,
            });
        }

        let (header_bytes, payload) = rest.split_at(HEADER_SIZE);
        let Ok(header_bytes) = <&[u8; HEADER_SIZE]>::try_from(header_bytes) else {
            return Err(MalformedPacket::TooShort { len: raw.len() });
        };

        Ok(Self {
            header: unpack(header_bytes),
            payload,
        })
    }

    /// Check the declared lengths against the physical packet.
    ///
    /// Large-frame chunks are validated against the 32-bit fields, legacy
    /// chunks against the 16-bit ones; in both cases the chunk must carry at
    /// least one byte and fit entirely inside the declared frame.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedPacket`] describing the first violated constraint.
    pub fn validate(&self) -> Result<(), MalformedPacket> {
        if self.payload.is_empty() {
            return Err(MalformedPacket::EmptyChunk);
        }

        let (offset, total) = if self.header.is_large_frame() {
            (self.header.offset_full, self.header.length_full)
        } else {
            (
                u32::from(self.header.offset_lower),
                u32::from(self.header.length_lower),
            )
        };

        if total == 0 {
            return Err(MalformedPacket::ZeroFrameLength);
        }
        let span_end = u64::from(offset) + self.payload.len() as u64;
        if span_end > u64::from(total) {
            return Err(MalformedPacket::ChunkOverrun {
                offset,
                len: self.payload.len(),
                total,
            });
        }
        Ok(())
    }
}

//! Feature bit mask carried in every chunk header.
//!
//! The mask travels as a single network-order `u64`. Bits the receiver does
//! not understand are preserved verbatim through pack/unpack so older and
//! newer endpoints can interoperate.

use derive_more::{From, Into};

/// Bit mask describing features of the frame a chunk belongs to.
///
/// # Examples
///
/// ```
/// use framecast::header::HeaderFlags;
///
/// let flags = HeaderFlags::LARGE_FRAME.with(HeaderFlags::KEY_FRAME);
/// assert!(flags.contains(HeaderFlags::LARGE_FRAME));
/// assert!(flags.contains(HeaderFlags::KEY_FRAME));
/// assert!(!flags.contains(HeaderFlags::ENCODER_H264));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, From, Into)]
pub struct HeaderFlags(u64);

impl HeaderFlags {
    /// The frame may exceed the legacy 16-bit range; the 32-bit offset and
    /// length fields are authoritative.
    pub const LARGE_FRAME: Self = Self(1);
    /// The chunk belongs to a key frame.
    pub const KEY_FRAME: Self = Self(1 << 1);
    /// The frame was produced by an H.264 encoder.
    pub const ENCODER_H264: Self = Self(1 << 2);
    /// The record-timestamp field carries a meaningful value.
    pub const RECORD_TIMESTAMP: Self = Self(1 << 3);

    /// The empty mask.
    #[must_use]
    pub const fn empty() -> Self { Self(0) }

    /// Reconstruct a mask from its raw wire value, preserving unknown bits.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self { Self(bits) }

    /// Return the raw wire value.
    #[must_use]
    pub const fn bits(self) -> u64 { self.0 }

    /// Whether every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool { self.0 & other.0 == other.0 }

    /// Union of two masks.
    #[must_use]
    pub const fn with(self, other: Self) -> Self { Self(self.0 | other.0) }

    /// Conditionally set `other`, returning the updated mask.
    #[must_use]
    pub const fn with_if(self, other: Self, condition: bool) -> Self {
        if condition { self.with(other) } else { self }
    }
}

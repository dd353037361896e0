//! Errors produced while chunking outbound frames.

use thiserror::Error;

/// Rejections raised before any chunk reaches the transport.
///
/// Transport-level failures are not errors of the send engine; they are
/// collected per chunk in the
/// [`FrameTransmission`](crate::send::FrameTransmission) report while the
/// remaining chunks are still attempted.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SendError {
    /// Zero-length frames carry no information and are rejected outright.
    #[error("cannot send an empty frame")]
    EmptyFrame,
    /// The frame cannot be described by the 32-bit length field.
    #[error("frame of {len} bytes exceeds the wire format's 32-bit range")]
    FrameTooLarge { len: usize },
}

//! Errors raised while constructing a session.

use thiserror::Error;

/// Construction-time rejections.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The configured packet size cannot fit the discriminator, the fixed
    /// header, and at least one payload byte.
    #[error("max packet size {max_packet_size} cannot fit the header and any payload")]
    PacketSizeTooSmall { max_packet_size: usize },
}

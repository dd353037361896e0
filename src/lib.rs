//! Real-time media framing over an unreliable, already-encrypted datagram
//! channel.
//!
//! `framecast` splits audio and video frames into MTU-sized chunks for
//! transmission and reconstructs the original frames from chunks that
//! arrive out of order, interleaved with other frames, or not at all.
//! Reliability is explicitly not provided: lost frames stay lost, and it is
//! the higher layer's decision whether to request a new key frame. The
//! crate owns no sockets and installs no runtime — the surrounding call
//! layer injects a transport, a congestion-feedback sink, and a frame
//! consumer at [`Session`] construction and drives everything through
//! synchronous calls.

pub mod byte_order;
pub mod frame;
pub mod header;
pub mod hooks;
pub mod metrics;
pub mod pool;
pub mod recv;
pub mod send;
pub mod session;

pub use frame::{CompletedFrame, FrameClass};
pub use header::{ChunkHeader, HEADER_SIZE, HeaderFlags, NO_FRAGMENT, PayloadKind};
pub use hooks::{CongestionFeedback, FrameConsumer, PacketTransport, TransportSendError};
pub use recv::{MalformedPacket, ReceiveError, ReceiveStats};
pub use send::{ChunkSendFailure, FrameTransmission, SendError};
pub use session::{FrameMeta, PeerId, Session, SessionConfig, SessionError, SessionStats};

//! Wire header model and codec for media chunks.
//!
//! Every wire packet is `[discriminator][header][payload]`: a one-byte
//! payload-type discriminator, the fixed 80-byte header serialised here, and
//! the chunk's share of the frame payload. The header layout, all multi-byte
//! integers network byte order:
//!
//! | bytes | field |
//! |---|---|
//! | 0 | version (bits 7–6), padding (5), keyframe (4), csrc count (3–0) |
//! | 1 | marker (bit 7), payload type (6–0) |
//! | 2–3 | sequence number |
//! | 4–7 | timestamp |
//! | 8–11 | source id |
//! | 12–19 | flags |
//! | 20–23 | full data offset |
//! | 24–27 | full data length |
//! | 28–31 | full received length |
//! | 32–39 | frame record timestamp |
//! | 40–43 | fragment number (signed) |
//! | 44–47 | real frame number |
//! | 48–51 | encoder bit rate |
//! | 52–75 | six reserved u32 fields, zero on the wire |
//! | 76–77 | lower data offset |
//! | 78–79 | lower data length |

pub mod chunk;
pub mod codec;
pub mod flags;
pub mod kind;

pub use chunk::{ChunkHeader, NO_FRAGMENT};
pub use codec::{pack, unpack};
pub use flags::HeaderFlags;
pub use kind::PayloadKind;

/// Serialised header size in bytes.
pub const HEADER_SIZE: usize = 80;

/// Format version stamped into the two version bits of every header.
pub const FORMAT_VERSION: u8 = 2;

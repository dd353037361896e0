//! Bit-exact serialisation of the chunk header.
//!
//! Both directions are total functions: every header packs to exactly
//! [`HEADER_SIZE`] bytes and every 80-byte buffer unpacks to a header.
//! Inbound bytes are attacker-controlled, so [`unpack`] only extracts
//! fields; validating declared lengths against the physical packet is the
//! receive engine's job. Sub-byte fields are packed with explicit shifts
//! and masks at fixed offsets, never via in-memory bit-field layout.

use super::{ChunkHeader, HEADER_SIZE, HeaderFlags};
use crate::byte_order::{
    read_network_i32,
    read_network_u16,
    read_network_u32,
    read_network_u64,
    write_network_i32,
    write_network_u16,
    write_network_u32,
    write_network_u64,
};

const SEQUENCE: usize = 2;
const TIMESTAMP: usize = 4;
const SOURCE_ID: usize = 8;
const FLAGS: usize = 12;
const OFFSET_FULL: usize = 20;
const LENGTH_FULL: usize = 24;
const RECEIVED_FULL: usize = 28;
const RECORD_TIMESTAMP: usize = 32;
const FRAGMENT: usize = 40;
const REAL_FRAME: usize = 44;
const BIT_RATE: usize = 48;
const PADDING: usize = 52;
const OFFSET_LOWER: usize = 76;
const LENGTH_LOWER: usize = 78;

/// Serialise a header to its 80-byte wire form.
///
/// Sub-byte fields must already be within their declared widths (version two
/// bits, contributing-source count four bits, payload type seven bits); the
/// send path constructs headers that satisfy this, and debug builds assert
/// it rather than silently truncating.
#[must_use]
pub fn pack(header: &ChunkHeader) -> [u8; HEADER_SIZE] {
    debug_assert!(header.version <= 0x03, "version exceeds two bits");
    debug_assert!(header.csrc_count <= 0x0f, "csrc count exceeds four bits");
    debug_assert!(header.payload_type <= 0x7f, "payload type exceeds seven bits");

    let mut out = [0u8; HEADER_SIZE];

    out[0] = (header.version & 0x03) << 6
        | u8::from(header.padding) << 5
        | u8::from(header.keyframe) << 4
        | (header.csrc_count & 0x0f);
    out[1] = u8::from(header.marker) << 7 | (header.payload_type & 0x7f);

    write_at(&mut out, SEQUENCE, &write_network_u16(header.sequence));
    write_at(&mut out, TIMESTAMP, &write_network_u32(header.timestamp));
    write_at(&mut out, SOURCE_ID, &write_network_u32(header.source_id));
    write_at(&mut out, FLAGS, &write_network_u64(header.flags.bits()));
    write_at(&mut out, OFFSET_FULL, &write_network_u32(header.offset_full));
    write_at(&mut out, LENGTH_FULL, &write_network_u32(header.length_full));
    write_at(&mut out, RECEIVED_FULL, &write_network_u32(header.received_full));
    write_at(
        &mut out,
        RECORD_TIMESTAMP,
        &write_network_u64(header.record_timestamp),
    );
    write_at(&mut out, FRAGMENT, &write_network_i32(header.fragment));
    write_at(&mut out, REAL_FRAME, &write_network_u32(header.real_frame));
    write_at(&mut out, BIT_RATE, &write_network_u32(header.bit_rate));
    // Bytes PADDING..OFFSET_LOWER are six reserved u32 fields, wired as zero.
    write_at(&mut out, OFFSET_LOWER, &write_network_u16(header.offset_lower));
    write_at(&mut out, LENGTH_LOWER, &write_network_u16(header.length_lower));

    out
}

/// Deserialise a header from its 80-byte wire form.
///
/// Extraction only: no field is validated against the packet that carried
/// it. Unknown flag bits and the reserved padding fields are preserved or
/// ignored respectively.
#[must_use]
pub fn unpack(bytes: &[u8; HEADER_SIZE]) -> ChunkHeader {
    ChunkHeader {
        version: bytes[0] >> 6,
        padding: bytes[0] & 0x20 != 0,
        keyframe: bytes[0] & 0x10 != 0,
        csrc_count: bytes[0] & 0x0f,
        marker: bytes[1] & 0x80 != 0,
        payload_type: bytes[1] & 0x7f,
        sequence: read_network_u16(take2(bytes, SEQUENCE)),
        timestamp: read_network_u32(take4(bytes, TIMESTAMP)),
        source_id: read_network_u32(take4(bytes, SOURCE_ID)),
        flags: HeaderFlags::from_bits(read_network_u64(take8(bytes, FLAGS))),
        offset_full: read_network_u32(take4(bytes, OFFSET_FULL)),
        length_full: read_network_u32(take4(bytes, LENGTH_FULL)),
        received_full: read_network_u32(take4(bytes, RECEIVED_FULL)),
        record_timestamp: read_network_u64(take8(bytes, RECORD_TIMESTAMP)),
        fragment: read_network_i32(take4(bytes, FRAGMENT)),
        real_frame: read_network_u32(take4(bytes, REAL_FRAME)),
        bit_rate: read_network_u32(take4(bytes, BIT_RATE)),
        offset_lower: read_network_u16(take2(bytes, OFFSET_LOWER)),
        length_lower: read_network_u16(take2(bytes, LENGTH_LOWER)),
    }
}

fn write_at(out: &mut [u8; HEADER_SIZE], at: usize, value: &[u8]) {
    if let Some(dst) = out.get_mut(at..at + value.len()) {
        dst.copy_from_slice(value);
    }
}

const fn take2(bytes: &[u8; HEADER_SIZE], at: usize) -> [u8; 2] { [bytes[at], bytes[at + 1]] }

const fn take4(bytes: &[u8; HEADER_SIZE], at: usize) -> [u8; 4] {
    [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]
}

const fn take8(bytes: &[u8; HEADER_SIZE], at: usize) -> [u8; 8] {
    [
        bytes[at],
        bytes[at + 1],
        bytes[at + 2],
        bytes[at + 3],
        bytes[at + 4],
        bytes[at + 5],
        bytes[at + 6],
        bytes[at + 7],
    ]
}

// Six reserved u32 fields sit between the bit-rate field and the legacy
// offsets.
const _: () = assert!(PADDING + 24 == OFFSET_LOWER);
const _: () = assert!(LENGTH_LOWER + 2 == HEADER_SIZE);

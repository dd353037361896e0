//! Pool pressure: capacity bounds, keyframe-aware eviction, and the loss
//! reports eviction produces.

mod common;

use common::{receiver, sender};
use framecast::{FrameClass, PayloadKind};

/// Send `count` two-chunk frames and deliver only the first chunk of each,
/// leaving that many partial frames in the receiver's pool.
fn deliver_partials(
    sender: &mut framecast::Session,
    packets: &common::SharedPackets,
    receiver: &mut framecast::Session,
    count: usize,
    keyframes: bool,
) -> Vec<Vec<Vec<u8>>> {
    let mut frames_wire = Vec::new();
    for index in 0..count {
        let payload = vec![index as u8; 2400];
        sender.send_frame(&payload, keyframes).expect("send succeeds");
        let wire = packets.take();
        assert_eq!(wire.len(), 2);
        receiver.on_packet(&wire[0]);
        frames_wire.push(wire);
    }
    frames_wire
}

#[test]
fn assembling_frames_never_exceed_pool_capacity() {
    let (mut sender, packets) = sender(PayloadKind::Video);
    let (mut receiver, frames, _) = receiver(PayloadKind::Video);

    for count in 1..=10usize {
        let payload = vec![count as u8; 2400];
        sender.send_frame(&payload, false).expect("send succeeds");
        let wire = packets.take();
        receiver.on_packet(&wire[0]);
        assert!(receiver.assembling() <= 3, "pool bound after {count} frames");
    }

    assert_eq!(frames.len(), 0);
    assert_eq!(receiver.stats().receive.frames_evicted, 7);
}

#[test]
fn eviction_reports_buffered_bytes_as_lost() {
    let (mut sender, packets) = sender(PayloadKind::Video);
    let (mut receiver, _, feedback) = receiver(PayloadKind::Video);

    deliver_partials(&mut sender, &packets, &mut receiver, 4, false);

    let log = feedback.log();
    assert_eq!(log.abandoned, vec![(1200, FrameClass::VideoDelta)]);
    assert_eq!(log.accepted_bytes, 4 * 1200);
    assert_eq!(log.malformed, 0);
}

#[test]
fn completing_an_interleaved_frame_after_eviction_is_not_spurious() {
    let (mut sender, packets) = sender(PayloadKind::Video);
    let (mut receiver, frames, _) = receiver(PayloadKind::Video);

    // Three partial frames fill the pool; a fourth frame's first chunk
    // evicts the oldest partial.
    let wire = deliver_partials(&mut sender, &packets, &mut receiver, 3, false);
    sender
        .send_frame(&vec![9u8; 2400], false)
        .expect("send succeeds");
    let fourth = packets.take();
    receiver.on_packet(&fourth[0]);
    assert_eq!(receiver.stats().receive.frames_evicted, 1);

    // The surviving partials complete normally.
    receiver.on_packet(&wire[1][1]);
    receiver.on_packet(&wire[2][1]);
    receiver.on_packet(&fourth[1]);
    let delivered = frames.take();
    assert_eq!(delivered.len(), 3);
    assert_eq!(delivered[0].payload(), vec![1u8; 2400].as_slice());
    assert_eq!(delivered[1].payload(), vec![2u8; 2400].as_slice());
    assert_eq!(delivered[2].payload(), vec![9u8; 2400].as_slice());

    // The evicted frame's second chunk starts a fresh partial; it must not
    // complete anything.
    receiver.on_packet(&wire[0][1]);
    assert_eq!(frames.len(), 0, "no spurious completion for evicted frame");
}

#[test]
fn a_new_keyframe_never_evicts_an_assembling_keyframe_over_a_delta() {
    let (mut sender, packets) = sender(PayloadKind::Video);
    let (mut receiver, _, feedback) = receiver(PayloadKind::Video);

    // Oldest in-flight frame is a keyframe, then two deltas.
    sender
        .send_frame(&vec![0u8; 2400], true)
        .expect("send succeeds");
    let keyframe_wire = packets.take();
    receiver.on_packet(&keyframe_wire[0]);
    deliver_partials(&mut sender, &packets, &mut receiver, 2, false);

    // A new keyframe needs a slot: a delta partial must be sacrificed.
    sender
        .send_frame(&vec![7u8; 2400], true)
        .expect("send succeeds");
    receiver.on_packet(&packets.take()[0]);

    let log = feedback.log();
    assert_eq!(log.abandoned.len(), 1);
    assert_eq!(
        log.abandoned[0].1,
        FrameClass::VideoDelta,
        "the keyframe partial survives"
    );
}

#[test]
fn keyframes_are_evicted_only_when_nothing_else_remains() {
    let (mut sender, packets) = sender(PayloadKind::Video);
    let (mut receiver, _, feedback) = receiver(PayloadKind::Video);

    deliver_partials(&mut sender, &packets, &mut receiver, 3, true);

    sender
        .send_frame(&vec![5u8; 2400], false)
        .expect("send succeeds");
    receiver.on_packet(&packets.take()[0]);

    let log = feedback.log();
    assert_eq!(log.abandoned.len(), 1);
    assert_eq!(log.abandoned[0].1, FrameClass::VideoKey);
}

#[test]
fn duplicates_of_a_partial_frame_do_not_inflate_progress() {
    let (mut sender, packets) = sender(PayloadKind::Video);
    let (mut receiver, frames, feedback) = receiver(PayloadKind::Video);

    sender
        .send_frame(&vec![3u8; 3600], false)
        .expect("send succeeds");
    let wire = packets.take();
    assert_eq!(wire.len(), 3);

    // Deliver the first chunk three times: still only 1200 of 3600 bytes.
    for _ in 0..3 {
        receiver.on_packet(&wire[0]);
    }
    assert_eq!(frames.len(), 0);
    assert_eq!(feedback.log().duplicate_chunks, 2);

    receiver.on_packet(&wire[1]);
    receiver.on_packet(&wire[2]);
    assert_eq!(frames.len(), 1, "completion only after all distinct bytes");
}

#[test]
fn malformed_packets_are_counted_and_reported() {
    let (mut receiver, frames, feedback) = receiver(PayloadKind::Video);

    receiver.on_packet(&[193u8, 0, 1, 2]);
    receiver.on_packet(&[]);

    assert_eq!(frames.len(), 0);
    assert_eq!(feedback.log().malformed, 2);
    assert_eq!(receiver.stats().receive.packets_malformed, 2);
}

//! Shared doubles for the integration suites: a capturing transport, a
//! frame collector, and a recording congestion-feedback sink.

// Items in this shared module may not be used by all test binaries that import it.
#![allow(
    dead_code,
    reason = "shared test utilities are not used by all test binaries"
)]

use std::{cell::RefCell, rc::Rc};

use framecast::{
    CompletedFrame,
    CongestionFeedback,
    FrameClass,
    PacketTransport,
    PayloadKind,
    PeerId,
    Session,
    SessionConfig,
    TransportSendError,
};

/// Wire packets captured from a sending session.
#[derive(Clone, Default)]
pub struct SharedPackets(Rc<RefCell<Vec<Vec<u8>>>>);

impl SharedPackets {
    pub fn take(&self) -> Vec<Vec<u8>> { self.0.borrow_mut().drain(..).collect() }
}

struct CapturingTransport(SharedPackets);

impl PacketTransport for CapturingTransport {
    fn send_packet(&mut self, packet: &[u8]) -> Result<(), TransportSendError> {
        self.0.0.borrow_mut().push(packet.to_vec());
        Ok(())
    }
}

/// Frames delivered to a receiving session's consumer callback.
#[derive(Clone, Default)]
pub struct SharedFrames(Rc<RefCell<Vec<CompletedFrame>>>);

impl SharedFrames {
    pub fn len(&self) -> usize { self.0.borrow().len() }

    pub fn take(&self) -> Vec<CompletedFrame> { self.0.borrow_mut().drain(..).collect() }
}

/// Everything the receive path told the congestion collaborator.
#[derive(Debug, Default)]
pub struct FeedbackLog {
    pub accepted_bytes: u64,
    pub duplicate_chunks: usize,
    pub gaps: Vec<(u16, FrameClass)>,
    pub malformed: usize,
    pub abandoned: Vec<(u32, FrameClass)>,
}

/// Recording congestion-feedback sink shared with the test body.
#[derive(Clone, Default)]
pub struct SharedFeedback(Rc<RefCell<FeedbackLog>>);

impl SharedFeedback {
    pub fn log(&self) -> std::cell::Ref<'_, FeedbackLog> { self.0.borrow() }
}

impl CongestionFeedback for SharedFeedback {
    fn on_chunk_accepted(&mut self, bytes: u32, _class: FrameClass) {
        self.0.borrow_mut().accepted_bytes += u64::from(bytes);
    }

    fn on_chunk_duplicate(&mut self, _bytes: u32, _class: FrameClass) {
        self.0.borrow_mut().duplicate_chunks += 1;
    }

    fn on_sequence_gap(&mut self, missing_frames: u16, class: FrameClass) {
        self.0.borrow_mut().gaps.push((missing_frames, class));
    }

    fn on_malformed_packet(&mut self) { self.0.borrow_mut().malformed += 1; }

    fn on_frame_abandoned(&mut self, buffered_bytes: u32, class: FrameClass) {
        self.0.borrow_mut().abandoned.push((buffered_bytes, class));
    }
}

/// A sending session whose wire packets land in the returned capture.
pub fn sender(kind: PayloadKind) -> (Session, SharedPackets) {
    let packets = SharedPackets::default();
    let session = Session::new(
        SessionConfig::new(kind, PeerId::new(1)),
        Box::new(CapturingTransport(packets.clone())),
        Box::new(SharedFeedback::default()),
        Box::new(|_| {}),
    )
    .expect("default config is valid");
    (session, packets)
}

/// A receiving session, already started, with handles to its deliveries and
/// its feedback log.
pub fn receiver(kind: PayloadKind) -> (Session, SharedFrames, SharedFeedback) {
    receiver_with(kind, |config| config)
}

/// As [`receiver`], with a hook to adjust the configuration first.
pub fn receiver_with(
    kind: PayloadKind,
    configure: impl FnOnce(SessionConfig) -> SessionConfig,
) -> (Session, SharedFrames, SharedFeedback) {
    let frames = SharedFrames::default();
    let feedback = SharedFeedback::default();
    let sink = frames.clone();
    let mut session = Session::new(
        configure(SessionConfig::new(kind, PeerId::new(1))),
        Box::new(CapturingTransport(SharedPackets::default())),
        Box::new(feedback.clone()),
        Box::new(move |frame| sink.0.borrow_mut().push(frame)),
    )
    .expect("config is valid");
    session.start_receiving();
    (session, frames, feedback)
}

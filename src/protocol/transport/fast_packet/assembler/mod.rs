//! NMEA 2000 Fast Packet assembler: rebuilds application payloads by
//! aggregating the CAN frames of a multi-frame sequence.
//!
//! One session exists per key (the PGN, optionally paired with the source
//! address). A frame with counter 0 opens a session, replacing whatever was
//! in progress for that key. Fragments are stored by frame counter and the
//! payload is concatenated in counter order once enough bytes are in, so
//! fragments may arrive out of order. Nothing ever times out: a session lives
//! until it completes or the next start frame replaces it, which keeps the
//! table at one entry per key.
use std::collections::{BTreeMap, HashMap};

use embassy_time::Instant;

use super::split_control_byte;
use crate::protocol::throttle::ThrottleGate;
use crate::protocol::transport::can_frame::CanFrame;

//==================================================================================Enums and Structs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// How sessions are keyed.
pub enum KeyMode {
    /// One session per PGN, whatever the source. Two nodes sending the same
    /// fast-packet PGN at once will disturb each other's sequences.
    #[default]
    Pgn,
    /// One session per `(PGN, source)` pair.
    PgnAndSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SessionKey {
    pgn: u32,
    source: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Why a frame did not change the reassembly table.
pub enum IgnoreReason {
    /// Start frame refused by the throttle gate.
    Throttled,
    /// Not enough data bytes to carry the fast-packet header.
    TooShort,
    /// Continuation frame with no session open for its key.
    NoSession,
    /// Continuation frame of another sequence than the open one.
    SequenceMismatch,
    /// Frame counter already stored for the open sequence.
    DuplicateFrame,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ProcessResult {
    /// Frame discarded; the table is unchanged.
    Ignored(IgnoreReason),
    /// Frame successfully integrated but additional fragments are still missing.
    FragmentConsumed,
    /// All expected bytes were received; the session has been removed.
    MessageComplete(CompletedMessage),
}

/// A reassembled fast-packet payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedMessage {
    pub pgn: u32,
    /// Source of the frame that opened the session.
    pub source: u8,
    /// Exactly the announced number of bytes.
    pub payload: Vec<u8>,
}

/// State of one in-progress sequence.
#[derive(Debug, Clone)]
struct FastPacketSession {
    source: u8,
    sequence_counter: u8,
    payload_length: usize,
    bytes_stored: usize,
    frames: BTreeMap<u8, Vec<u8>>,
}

impl FastPacketSession {
    fn store(&mut self, frame_counter: u8, payload: &[u8]) {
        self.bytes_stored += payload.len();
        self.frames.insert(frame_counter, payload.to_vec());
    }

    fn is_complete(&self) -> bool {
        self.bytes_stored >= self.payload_length
    }

    /// Concatenate fragments by frame counter and cut to the announced length.
    fn into_payload(self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(self.bytes_stored);
        for fragment in self.frames.into_values() {
            payload.extend_from_slice(&fragment);
        }
        payload.truncate(self.payload_length);
        payload
    }
}

/// Reassembly table for one connection.
#[derive(Debug, Clone, Default)]
pub struct FastPacketAssembler {
    key_mode: KeyMode,
    sessions: HashMap<SessionKey, FastPacketSession>,
}

impl FastPacketAssembler {
    pub fn new(key_mode: KeyMode) -> Self {
        Self {
            key_mode,
            sessions: HashMap::new(),
        }
    }

    pub fn key_mode(&self) -> KeyMode {
        self.key_mode
    }

    fn key(&self, pgn: u32, source: u8) -> SessionKey {
        match self.key_mode {
            KeyMode::Pgn => SessionKey { pgn, source: None },
            KeyMode::PgnAndSource => SessionKey {
                pgn,
                source: Some(source),
            },
        }
    }

    //==================================================================================Process Functions
    /// Process a CAN frame known to belong to a fast-packet PGN.
    ///
    /// Start frames are first offered to `throttle`; a refused start leaves
    /// the table untouched.
    pub fn process_frame(
        &mut self,
        frame: &CanFrame,
        throttle: &mut ThrottleGate,
        now: Instant,
    ) -> ProcessResult {
        let data = frame.data();
        let Some((&control, rest)) = data.split_last() else {
            return ProcessResult::Ignored(IgnoreReason::TooShort);
        };
        let (sequence_counter, frame_counter) = split_control_byte(control);
        let pgn = frame.pgn();
        let key = self.key(pgn, frame.source());

        if frame_counter == 0 {
            let Some((&payload_length, payload)) = rest.split_last() else {
                return ProcessResult::Ignored(IgnoreReason::TooShort);
            };

            if !throttle.accept(pgn, now) {
                return ProcessResult::Ignored(IgnoreReason::Throttled);
            }

            if let Some(previous) = self.sessions.get(&key) {
                log::debug!(
                    "PGN {}: sequence {} superseded by sequence {} after {} bytes",
                    pgn,
                    previous.sequence_counter,
                    sequence_counter,
                    previous.bytes_stored
                );
            }

            let mut session = FastPacketSession {
                source: frame.source(),
                sequence_counter,
                payload_length: payload_length as usize,
                bytes_stored: 0,
                frames: BTreeMap::new(),
            };
            session.store(0, payload);
            self.sessions.insert(key, session);
        } else {
            let Some(session) = self.sessions.get_mut(&key) else {
                log::debug!(
                    "Ignoring frame {} for PGN {} as first frame has not been received.",
                    frame_counter,
                    pgn
                );
                return ProcessResult::Ignored(IgnoreReason::NoSession);
            };
            if session.sequence_counter != sequence_counter {
                log::debug!(
                    "Ignoring frame {} of sequence {} for PGN {}: current sequence is {}",
                    frame_counter,
                    sequence_counter,
                    pgn,
                    session.sequence_counter
                );
                return ProcessResult::Ignored(IgnoreReason::SequenceMismatch);
            }
            if session.frames.contains_key(&frame_counter) {
                log::debug!("Frame {} for PGN {} is already stored.", frame_counter, pgn);
                return ProcessResult::Ignored(IgnoreReason::DuplicateFrame);
            }
            session.store(frame_counter, rest);
        }

        let complete = self
            .sessions
            .get(&key)
            .is_some_and(FastPacketSession::is_complete);
        if !complete {
            return ProcessResult::FragmentConsumed;
        }

        match self.sessions.remove(&key) {
            Some(session) => {
                let source = session.source;
                let payload = session.into_payload();
                log::debug!(
                    "All fast packet frames collected for PGN {} ({} bytes)",
                    pgn,
                    payload.len()
                );
                ProcessResult::MessageComplete(CompletedMessage {
                    pgn,
                    source,
                    payload,
                })
            }
            None => ProcessResult::FragmentConsumed,
        }
    }

    //==================================================================================Inspection
    /// Number of sessions currently open.
    pub fn pending(&self) -> usize {
        self.sessions.len()
    }

    /// Whether a session is open for the key `pgn`/`source` maps to.
    pub fn is_collecting(&self, pgn: u32, source: u8) -> bool {
        self.sessions.contains_key(&self.key(pgn, source))
    }

    /// Payload bytes stored so far for the open session, if any.
    pub fn bytes_stored(&self, pgn: u32, source: u8) -> Option<usize> {
        self.sessions
            .get(&self.key(pgn, source))
            .map(|s| s.bytes_stored)
    }

    /// Frame counters stored so far for the open session, ascending.
    pub fn stored_frames(&self, pgn: u32, source: u8) -> Option<Vec<u8>> {
        self.sessions
            .get(&self.key(pgn, source))
            .map(|s| s.frames.keys().copied().collect())
    }

    /// Discard every open session.
    pub fn reset(&mut self) {
        self.sessions.clear();
    }
}

//! Incremental framer turning the gateway byte stream into frame bodies.
//!
//! Two gateway families are supported:
//!
//! * **Delimited** (USB-CAN adapters): `0xAA <body> 0x55`. The body is
//!   everything between the markers.
//! * **Fixed length** (Ethernet-CAN servers): 13-byte frames back to back,
//!   each followed by one separator byte that carries nothing.
//!
//! The framer can be fed arbitrary chunks and yields whole frames when they
//! are available. It never blocks: an incomplete frame stays buffered until
//! the next [`TransportFramer::push`].
use bytes::{Buf, Bytes, BytesMut};

use crate::error::FrameError;

/// Start-of-frame marker on delimited transports.
pub const FRAME_START: u8 = 0xAA;
/// End-of-frame marker on delimited transports.
pub const FRAME_END: u8 = 0x55;
/// Marker-to-marker span below which a candidate is silently discarded.
pub const DELIMITED_MIN_SPAN: usize = 3;
/// `AA` + type byte + 4 identifier bytes + `55`.
pub const DELIMITED_MIN_FRAME: usize = 7;
/// Bytes buffered after a start marker before giving up on its terminator.
const DELIMITED_RESYNC_LIMIT: usize = 64;
/// Size of one fixed-length frame.
pub const FIXED_FRAME_LEN: usize = 13;
/// Separator bytes following each fixed-length frame.
pub const FIXED_SEPARATOR_LEN: usize = 1;

//==================================================================================TransportKind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Framing discipline used by a gateway family.
pub enum TransportKind {
    /// `0xAA ... 0x55` bounded frames.
    Delimited,
    /// 13-byte frames plus one separator byte.
    FixedLength,
}

//==================================================================================TransportFramer
/// Buffering framer for one connection.
#[derive(Debug)]
pub struct TransportFramer {
    kind: TransportKind,
    buf: BytesMut,
    /// Separator bytes still owed by the previous fixed-length frame.
    pending_skip: usize,
}

impl TransportFramer {
    pub fn new(kind: TransportKind) -> Self {
        Self {
            kind,
            buf: BytesMut::with_capacity(256),
            pending_skip: 0,
        }
    }

    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    /// Number of bytes waiting for a complete frame.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Append a chunk read from the transport.
    pub fn push(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Drop buffered bytes, e.g. after a reconnect.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.pending_skip = 0;
    }

    /// Extract the next frame body.
    ///
    /// * `None` – need more data.
    /// * `Some(Ok(body))` – one frame body with the envelope stripped.
    /// * `Some(Err(_))` – a frame was delimited but is too short to decode;
    ///   it has already been consumed and the caller should keep polling.
    pub fn next_frame(&mut self) -> Option<Result<Bytes, FrameError>> {
        match self.kind {
            TransportKind::Delimited => self.next_delimited(),
            TransportKind::FixedLength => self.next_fixed(),
        }
    }

    fn next_delimited(&mut self) -> Option<Result<Bytes, FrameError>> {
        loop {
            // Bytes before a start marker can never belong to a frame.
            match self.buf.iter().position(|&b| b == FRAME_START) {
                Some(start) => self.buf.advance(start),
                None => {
                    self.buf.clear();
                    return None;
                }
            }

            let end = match self.buf.iter().skip(1).position(|&b| b == FRAME_END) {
                Some(offset) => offset + 1,
                None => {
                    if self.buf.len() > DELIMITED_RESYNC_LIMIT {
                        // Lost terminator: abandon this start marker and rescan.
                        self.buf.advance(1);
                        continue;
                    }
                    return None;
                }
            };

            let candidate = self.buf.split_to(end + 1).freeze();
            if candidate.len() < DELIMITED_MIN_SPAN {
                continue;
            }
            if candidate.len() < DELIMITED_MIN_FRAME {
                return Some(Err(FrameError::TooShort {
                    len: candidate.len(),
                    min: DELIMITED_MIN_FRAME,
                }));
            }
            return Some(Ok(candidate.slice(1..candidate.len() - 1)));
        }
    }

    fn next_fixed(&mut self) -> Option<Result<Bytes, FrameError>> {
        if self.pending_skip > 0 {
            let n = self.pending_skip.min(self.buf.len());
            self.buf.advance(n);
            self.pending_skip -= n;
            if self.pending_skip > 0 {
                return None;
            }
        }

        if self.buf.len() < FIXED_FRAME_LEN {
            return None;
        }

        let frame = self.buf.split_to(FIXED_FRAME_LEN).freeze();
        self.pending_skip = FIXED_SEPARATOR_LEN;
        Some(Ok(frame))
    }
}

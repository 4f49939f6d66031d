//! Messages handed downstream and the seam to the PGN field decoder.
//!
//! The pipeline stops at raw payload bytes. Turning a payload into named
//! fields needs a PGN definition table, which lives outside this crate
//! behind [`FieldDecoder`]. [`DecodingSink`] glues such a decoder onto the
//! pipeline output.
use core::fmt;

use crate::protocol::transport::traits::message_sink::MessageSink;

//==================================================================================N2kMessage
#[derive(Debug, Clone, PartialEq, Eq)]
/// One complete NMEA 2000 message: a single frame's data, or a reassembled
/// fast-packet payload.
pub struct N2kMessage {
    pub pgn: u32,
    pub source: u8,
    pub payload: Vec<u8>,
    /// Whether the payload came out of fast-packet reassembly.
    pub fast_packet: bool,
}

//==================================================================================Fields
#[derive(Debug, Clone, PartialEq)]
/// Value of one decoded field.
pub enum FieldValue {
    Numeric(f64),
    Text(String),
    /// Field present in the layout but carrying its "not available" pattern.
    Absent,
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Numeric(v) => write!(f, "{v}"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Absent => f.write_str("n/a"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedField {
    /// Stable identifier, e.g. `"latitude"`.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    pub value: FieldValue,
    /// Physical unit, when the field has one.
    pub unit: Option<String>,
}

/// PGN definition table: turns a payload into ordered fields.
pub trait FieldDecoder {
    /// `None` when the PGN has no definition or the payload does not fit it.
    fn decode(&self, pgn: u32, payload: &[u8]) -> Option<Vec<DecodedField>>;
}

//==================================================================================DecodingSink
/// [`MessageSink`] running every message through a [`FieldDecoder`] and
/// handing the result to a callback.
pub struct DecodingSink<D, F> {
    decoder: D,
    on_fields: F,
    undecoded: u64,
}

impl<D, F> DecodingSink<D, F>
where
    D: FieldDecoder,
    F: FnMut(&N2kMessage, Vec<DecodedField>),
{
    pub fn new(decoder: D, on_fields: F) -> Self {
        Self {
            decoder,
            on_fields,
            undecoded: 0,
        }
    }

    /// Messages the decoder had no definition for.
    pub fn undecoded(&self) -> u64 {
        self.undecoded
    }
}

impl<D, F> MessageSink for DecodingSink<D, F>
where
    D: FieldDecoder,
    F: FnMut(&N2kMessage, Vec<DecodedField>),
{
    fn on_message(&mut self, message: N2kMessage) {
        match self.decoder.decode(message.pgn, &message.payload) {
            Some(fields) => (self.on_fields)(&message, fields),
            None => {
                self.undecoded += 1;
                log::debug!(
                    "No field definition for PGN {} ({} bytes from source {})",
                    message.pgn,
                    message.payload.len(),
                    message.source
                );
            }
        }
    }
}

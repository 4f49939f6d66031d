//! In-memory representation of an NMEA 2000 CAN frame and the decoder that
//! extracts it from a gateway frame body.
//!
//! Body layout once the transport envelope is stripped:
//!
//! ```text
//! <type byte> <id: 4 bytes, LSB first> <data: dlc bytes, last byte first> [padding]
//! ```
//!
//! The low nibble of the type byte is the data length code.
use embedded_can::{ExtendedId, Id};

use crate::core::MAX_CAN_DATA;
use crate::error::FrameError;
use crate::protocol::transport::can_id::CanId;

/// Type byte plus the four identifier bytes.
pub const HEADER_LEN: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Raw NMEA 2000 frame as forwarded by the gateway.
pub struct CanFrame {
    /// Full arbitration identifier stored inside a `u32`.
    pub id: CanId,
    /// Payload buffer, already put back in bus order.
    pub data: [u8; 8],
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub len: usize,
}

impl CanFrame {
    /// Build a frame from an identifier and up to eight data bytes.
    pub fn from_parts(id: CanId, data: &[u8]) -> Option<Self> {
        if data.len() > MAX_CAN_DATA {
            return None;
        }
        let mut buf = [0u8; 8];
        buf[..data.len()].copy_from_slice(data);
        Some(Self {
            id,
            data: buf,
            len: data.len(),
        })
    }

    /// Decode one frame body.
    ///
    /// Both the identifier and the data bytes travel reversed on the wire;
    /// this puts them back in logical order. Bytes past the announced data
    /// length are padding and ignored.
    pub fn decode(body: &[u8]) -> Result<Self, FrameError> {
        if body.len() < HEADER_LEN {
            return Err(FrameError::TooShort {
                len: body.len(),
                min: HEADER_LEN,
            });
        }

        let dlc = body[0] & 0x0F;
        if dlc as usize > MAX_CAN_DATA {
            return Err(FrameError::InvalidDataLength { dlc });
        }

        let id = CanId::from_wire([body[1], body[2], body[3], body[4]]);

        let end = HEADER_LEN + dlc as usize;
        let raw = body.get(HEADER_LEN..end).ok_or(FrameError::Truncated {
            needed: end,
            available: body.len(),
        })?;

        let mut data = [0u8; 8];
        for (dst, src) in data.iter_mut().zip(raw.iter().rev()) {
            *dst = *src;
        }

        Ok(Self {
            id,
            data,
            len: dlc as usize,
        })
    }

    /// Parameter group number carried by the identifier.
    #[inline]
    pub fn pgn(&self) -> u32 {
        self.id.pgn()
    }

    /// Source address of the transmitting node.
    #[inline]
    pub fn source(&self) -> u8 {
        self.id.source_address()
    }

    /// Valid payload bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

impl embedded_can::Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        match id.into() {
            Id::Extended(ext) => Self::from_parts(CanId::from(ext), data),
            // NMEA 2000 only uses 29-bit identifiers.
            Id::Standard(_) => None,
        }
    }

    fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> {
        None
    }

    fn is_extended(&self) -> bool {
        true
    }

    fn is_remote_frame(&self) -> bool {
        false
    }

    fn id(&self) -> Id {
        let raw = self.id.0 & ExtendedId::MAX.as_raw();
        Id::Extended(ExtendedId::new(raw).unwrap_or(ExtendedId::ZERO))
    }

    fn dlc(&self) -> usize {
        self.len
    }

    fn data(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

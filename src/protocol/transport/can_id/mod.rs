//! Extraction of the fields packed into the 29-bit arbitration identifier
//! that the gateways forward with every CAN frame.
use crate::core::PGN_MASK;

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Encapsulates an extended CAN identifier (29 bits) and exposes accessors
/// for priority, PGN, destination, and source.
pub struct CanId(pub u32);

impl CanId {
    /// Interpret the four identifier bytes exactly as the gateway sends them.
    ///
    /// Gateways emit the identifier least significant byte first, so the
    /// bytes are reversed before being read as a big-endian integer.
    pub fn from_wire(bytes: [u8; 4]) -> Self {
        CanId(u32::from_le_bytes(bytes))
    }

    /// Returns the priority (3 bits, value 0-7) encoded in the CAN ID.
    pub fn priority(&self) -> u8 {
        ((self.0 >> 26) & 0x07) as u8
    }

    /// The 18 bits above the source address, taken as-is.
    ///
    /// For addressed (PDU1) messages the destination byte stays part of the
    /// returned value. Downstream tables key on this raw number.
    pub fn pgn(&self) -> u32 {
        (self.0 >> 8) & PGN_MASK
    }

    /// Returns the destination address (PDU1) when the PF byte marks the
    /// message as addressed.
    pub fn destination(&self) -> Option<u8> {
        let pf = ((self.0 >> 16) & 0xFF) as u8;
        if pf >= 240 {
            None
        } else {
            Some(((self.0 >> 8) & 0xFF) as u8)
        }
    }

    /// Eight-bit source address (logical node identifier on the N2K network).
    pub fn source_address(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

impl From<embedded_can::ExtendedId> for CanId {
    fn from(id: embedded_can::ExtendedId) -> Self {
        CanId(id.as_raw())
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;

//! NMEA 2000 Fast Packet support: payloads larger than eight bytes spread
//! across successive CAN frames.
//!
//! Gateways hand the frame data over reversed, so the fast-packet control
//! byte is the **last** data byte and, on the first frame, the total length
//! is the second-to-last:
//!
//! ```text
//! first frame:  <payload: up to 6 bytes> <length> <seq:3|frame:5>
//! other frames: <payload: up to 7 bytes> <seq:3|frame:5>
//! ```
/// Frame counters are five bits wide.
pub const FRAME_COUNTER_MASK: u8 = 0b1_1111;

/// Sequence counters are three bits wide, above the frame counter.
pub const SEQUENCE_COUNTER_MASK: u8 = 0b111;

pub mod assembler;
pub mod catalog;

/// Split a control byte into `(sequence_counter, frame_counter)`.
#[inline]
pub const fn split_control_byte(byte: u8) -> (u8, u8) {
    ((byte >> 5) & SEQUENCE_COUNTER_MASK, byte & FRAME_COUNTER_MASK)
}

//! NMEA 2000 gateway transport layer: byte stream framing, CAN frame
//! representations, 29-bit identifier accessors, Fast Packet reassembly, and
//! the I/O abstraction traits.
//!
//! Both supported gateway families store the identifier and the payload in
//! reverse byte order relative to CAN wire order; [`can_frame`] undoes that.

pub mod can_frame;
pub mod can_id;
pub mod fast_packet;
pub mod framer;
pub mod traits;

//! Unit tests for the `CanId` accessors.
use super::*;

//==================================================================================CAN_ID
#[test]
/// Extracts the source address from the raw ID.
fn test_source_address() {
    let can_id = CanId(0xFAE225D1);
    assert_eq!(can_id.source_address(), 0xD1);
}

#[test]
/// Verifies extraction of the 3-bit priority field.
fn test_priority() {
    let can_id = CanId(0x19F80523);
    assert_eq!(can_id.priority(), 0b110)
}

#[test]
/// The PGN is the raw 18-bit field, destination byte included.
fn test_pgn_is_raw_eighteen_bits() {
    // Priority 2, PGN 129025 (0x1F801), source 0x23.
    let broadcast = CanId(0x09F80123);
    assert_eq!(broadcast.pgn(), 129025);

    // ISO request (PF 0xEA) addressed to 0x80: destination stays in the value.
    let addressed = CanId(0x18EA8023);
    assert_eq!(addressed.pgn(), 0xEA80);
    assert_eq!(addressed.destination(), Some(0x80));
    assert_eq!(broadcast.destination(), None);
}

#[test]
/// Identifier bytes arrive least significant first.
fn test_from_wire_reverses_bytes() {
    let can_id = CanId::from_wire([0x11, 0x22, 0x33, 0x44]);
    assert_eq!(can_id.0, 0x4433_2211);
    assert_eq!(can_id.source_address(), 0x11);
    assert_eq!(can_id.pgn(), 0x3322);
}

#[test]
/// Bits above the 29-bit identifier never leak into the PGN.
fn test_pgn_masks_upper_bits() {
    let can_id = CanId(0xFFFF_FFFF);
    assert_eq!(can_id.pgn(), 0x3FFFF);
}

#[test]
fn test_from_embedded_can_id() {
    let raw = embedded_can::ExtendedId::new(0x09F80123).expect("fits in 29 bits");
    assert_eq!(CanId::from(raw).pgn(), 129025);
}

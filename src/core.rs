//! Constants shared by the transport layer, the configuration model and the
//! pipeline.

/// Mask selecting the 18 meaningful PGN bits once the source byte is shifted out.
pub const PGN_MASK: u32 = 0x3FFFF;

/// Largest PGN value representable in the arbitration field.
pub const MAX_PGN: u32 = PGN_MASK;

/// Classic CAN frames carry at most eight payload bytes.
pub const MAX_CAN_DATA: usize = 8;

/// PGNs carrying AIS traffic. Busy harbours flood the bus with these, so the
/// `exclude_ais` option drops them wholesale.
pub const AIS_PGNS: [u32; 10] = [
    129038, // Class A position report
    129039, // Class B position report
    129040, // Class B extended position report
    129793, // UTC and date report
    129794, // Class A static and voyage data
    129797, // Binary broadcast message
    129807, // Class B group assignment
    129809, // Class B static data, part A
    129810, // Class B static data, part B
    130842, // SimNet AIS class B static data
];

//! Which PGNs travel as fast packets.
//!
//! A CAN frame does not say whether it is a fast-packet fragment; only the
//! PGN definition does. The catalog carries the well-known multi-frame PGNs
//! and accepts extras from configuration.
use std::collections::BTreeSet;

/// Multi-frame PGNs defined by NMEA 2000 and in common proprietary use.
pub const WELL_KNOWN_FAST_PACKET_PGNS: &[u32] = &[
    126208, 126464, 126710, 126711, 126720, 126983, 126984, 126985, 126986, 126987, 126988,
    126996, 126998, 127233, 127237, 127489, 127490, 127491, 127494, 127495, 127496, 127497,
    127498, 127503, 127504, 127506, 127507, 127509, 127510, 127511, 127512, 127513, 127514,
    128275, 128520, 128538, 129029, 129038, 129039, 129040, 129041, 129044, 129045, 129284,
    129285, 129301, 129302, 129538, 129540, 129541, 129542, 129545, 129547, 129549, 129551,
    129556, 129792, 129793, 129794, 129795, 129796, 129797, 129798, 129799, 129800, 129801,
    129802, 129803, 129804, 129805, 129806, 129807, 129808, 129809, 129810, 130052, 130053,
    130054, 130060, 130061, 130064, 130065, 130066, 130067, 130068, 130069, 130070, 130071,
    130072, 130073, 130074, 130320, 130321, 130322, 130323, 130324, 130330, 130560, 130567,
    130569, 130570, 130571, 130572, 130573, 130574, 130577, 130578, 130580, 130581, 130583,
    130584, 130586, 130816, 130817, 130818, 130819, 130820, 130821, 130822, 130823, 130824,
    130825, 130827, 130828, 130831, 130832, 130834, 130835, 130836, 130837, 130838, 130839,
    130840, 130842, 130843, 130845, 130846, 130847, 130850, 130851, 130856, 130860, 130880,
    130881, 130944,
];

/// PDU format values from here on are broadcast-only (PDU2).
const PDU2_MIN_FORMAT: u32 = 240;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastPacketCatalog {
    pgns: BTreeSet<u32>,
}

impl Default for FastPacketCatalog {
    fn default() -> Self {
        Self::well_known()
    }
}

impl FastPacketCatalog {
    /// Catalog with no fast-packet PGNs at all.
    pub fn empty() -> Self {
        Self {
            pgns: BTreeSet::new(),
        }
    }

    /// Catalog seeded with [`WELL_KNOWN_FAST_PACKET_PGNS`].
    pub fn well_known() -> Self {
        Self {
            pgns: WELL_KNOWN_FAST_PACKET_PGNS.iter().copied().collect(),
        }
    }

    /// Add PGNs the well-known table does not cover.
    pub fn with_extra<I: IntoIterator<Item = u32>>(mut self, extra: I) -> Self {
        self.pgns.extend(extra);
        self
    }

    /// Look up the PGN carried by a frame identifier.
    ///
    /// Addressed (PDU1) PGNs still hold the destination in their low byte;
    /// they match the catalog entry with that byte cleared.
    pub fn is_fast_packet(&self, pgn: u32) -> bool {
        if self.pgns.contains(&pgn) {
            return true;
        }
        let pdu_format = (pgn >> 8) & 0xFF;
        pdu_format < PDU2_MIN_FORMAT && self.pgns.contains(&(pgn & !0xFF))
    }

    pub fn len(&self) -> usize {
        self.pgns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pgns.is_empty()
    }
}

//! Include/exclude PGN filter.
//!
//! A non-empty include list wins outright: only listed PGNs pass and the
//! exclude list is ignored. Otherwise listed exclusions are dropped and
//! everything else passes.
use std::collections::BTreeSet;

/// Decide whether `pgn` passes the given include/exclude sets.
pub fn allowed(pgn: u32, include: &BTreeSet<u32>, exclude: &BTreeSet<u32>) -> bool {
    if !include.is_empty() {
        include.contains(&pgn)
    } else if !exclude.is_empty() {
        !exclude.contains(&pgn)
    } else {
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Owned include/exclude sets.
pub struct PgnFilter {
    include: BTreeSet<u32>,
    exclude: BTreeSet<u32>,
}

impl PgnFilter {
    pub fn new(include: BTreeSet<u32>, exclude: BTreeSet<u32>) -> Self {
        Self { include, exclude }
    }

    /// Filter letting everything through.
    pub fn allow_all() -> Self {
        Self::default()
    }

    #[inline]
    pub fn allows(&self, pgn: u32) -> bool {
        allowed(pgn, &self.include, &self.exclude)
    }

    pub fn include(&self) -> &BTreeSet<u32> {
        &self.include
    }

    pub fn exclude(&self) -> &BTreeSet<u32> {
        &self.exclude
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;

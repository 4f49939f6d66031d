//! Rate limit on new fast-packet sequences.
//!
//! Every PGN may start at most one reassembly per `min_interval`. Only
//! first frames (frame counter 0) are checked; fragments of an admitted
//! sequence always pass. This bounds the work a flooding talker can cause
//! regardless of how fast it sends start frames.
use std::collections::HashMap;

use embassy_time::{Duration, Instant};

/// Default spacing between admitted sequences of the same PGN.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ThrottleGate {
    min_interval: Duration,
    last_accepted: HashMap<u32, Instant>,
}

impl Default for ThrottleGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

impl ThrottleGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_accepted: HashMap::new(),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Admit `pgn` at `now` and remember the admission, or refuse it when the
    /// previous admission is less than `min_interval` old.
    ///
    /// A clock running backwards counts as zero elapsed time.
    pub fn accept(&mut self, pgn: u32, now: Instant) -> bool {
        let admitted = match self.last_accepted.get(&pgn) {
            None => true,
            Some(last) => now.saturating_duration_since(*last) >= self.min_interval,
        };

        if admitted {
            self.last_accepted.insert(pgn, now);
        } else {
            log::debug!("Throttling activated for PGN {}", pgn);
        }
        admitted
    }

    /// Last admission time for `pgn`, if any.
    pub fn last_accepted(&self, pgn: u32) -> Option<Instant> {
        self.last_accepted.get(&pgn).copied()
    }

    /// Forget all admissions (new connection).
    pub fn reset(&mut self) {
        self.last_accepted.clear();
    }
}

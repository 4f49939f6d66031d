//! Counters kept by the pipeline and the messages-per-minute figure derived
//! from them.
use embassy_time::Instant;

use crate::protocol::transport::fast_packet::assembler::IgnoreReason;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub bytes_received: u64,
    pub frames_decoded: u64,
    /// Frames rejected by the framer length check or the decoder.
    pub frames_malformed: u64,
    /// Decoded frames refused by the PGN filter.
    pub frames_filtered: u64,
    pub fast_packet_fragments: u64,
    pub throttled_starts: u64,
    /// Fragments dropped for sequence, duplicate, missing-start or length reasons.
    pub reassembly_drops: u64,
    pub single_frame_messages: u64,
    pub fast_packet_messages: u64,
}

impl PipelineStats {
    /// Messages handed to the sink so far.
    pub fn messages_emitted(&self) -> u64 {
        self.single_frame_messages + self.fast_packet_messages
    }

    pub(crate) fn record_ignored(&mut self, reason: IgnoreReason) {
        match reason {
            IgnoreReason::Throttled => self.throttled_starts += 1,
            IgnoreReason::TooShort
            | IgnoreReason::NoSession
            | IgnoreReason::SequenceMismatch
            | IgnoreReason::DuplicateFrame => self.reassembly_drops += 1,
        }
    }
}

/// Converts a growing message total into a messages-per-minute rate between
/// samples.
#[derive(Debug, Clone, Copy)]
pub struct MessageRate {
    last_total: u64,
    last_sample: Instant,
}

impl MessageRate {
    pub fn new(total: u64, now: Instant) -> Self {
        Self {
            last_total: total,
            last_sample: now,
        }
    }

    /// Rate since the previous sample, or `None` when no time has passed.
    /// The sample point moves forward only when a rate is produced.
    pub fn sample(&mut self, total: u64, now: Instant) -> Option<u64> {
        let elapsed_ms = now.saturating_duration_since(self.last_sample).as_millis();
        if elapsed_ms == 0 {
            return None;
        }
        let delta = total.saturating_sub(self.last_total);
        self.last_total = total;
        self.last_sample = now;
        Some(delta.saturating_mul(60_000) / elapsed_ms)
    }
}

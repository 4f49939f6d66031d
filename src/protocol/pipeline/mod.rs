//! Frame processing pipeline for one gateway connection:
//!
//! ```text
//! bytes -> framer -> decoder -> filter -> [fast packet: throttle + assembler] -> sink
//! ```
//!
//! Everything here is synchronous and runs to completion between two reads.
//! Malformed frames and reassembly drops are counted and logged, never
//! returned as errors.
use embassy_time::{Duration, Instant};

use crate::config::ValidatedConfig;
use crate::protocol::filter::PgnFilter;
use crate::protocol::messages::N2kMessage;
use crate::protocol::throttle::ThrottleGate;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::fast_packet::assembler::{
    FastPacketAssembler, KeyMode, ProcessResult,
};
use crate::protocol::transport::fast_packet::catalog::FastPacketCatalog;
use crate::protocol::transport::framer::{TransportFramer, TransportKind};
use crate::protocol::transport::traits::message_sink::MessageSink;

pub mod stats;

pub use stats::{MessageRate, PipelineStats};

//==================================================================================ReassemblyEngine
/// Reassembly and throttle tables owned by one connection.
#[derive(Debug, Clone, Default)]
pub struct ReassemblyEngine {
    assembler: FastPacketAssembler,
    throttle: ThrottleGate,
}

impl ReassemblyEngine {
    pub fn new(key_mode: KeyMode, min_interval: Duration) -> Self {
        Self {
            assembler: FastPacketAssembler::new(key_mode),
            throttle: ThrottleGate::new(min_interval),
        }
    }

    pub fn process(&mut self, frame: &CanFrame, now: Instant) -> ProcessResult {
        self.assembler.process_frame(frame, &mut self.throttle, now)
    }

    pub fn assembler(&self) -> &FastPacketAssembler {
        &self.assembler
    }

    pub fn throttle(&self) -> &ThrottleGate {
        &self.throttle
    }

    /// Empty both tables. Sequence counters restart with the connection.
    pub fn reset(&mut self) {
        self.assembler.reset();
        self.throttle.reset();
    }
}

//==================================================================================Pipeline
#[derive(Debug)]
pub struct Pipeline {
    framer: TransportFramer,
    filter: PgnFilter,
    catalog: FastPacketCatalog,
    engine: ReassemblyEngine,
    stats: PipelineStats,
}

impl Pipeline {
    pub fn new(
        kind: TransportKind,
        filter: PgnFilter,
        catalog: FastPacketCatalog,
        engine: ReassemblyEngine,
    ) -> Self {
        Self {
            framer: TransportFramer::new(kind),
            filter,
            catalog,
            engine,
            stats: PipelineStats::default(),
        }
    }

    /// Build the pipeline described by a validated configuration.
    pub fn from_config(config: &ValidatedConfig) -> Self {
        Self::new(
            config.transport,
            config.filter.clone(),
            config.catalog.clone(),
            ReassemblyEngine::new(config.key_mode, config.min_interval),
        )
    }

    /// Feed one chunk read from the transport and forward every message it
    /// completes. Returns how many messages reached `sink`.
    pub fn push<S: MessageSink + ?Sized>(
        &mut self,
        chunk: &[u8],
        now: Instant,
        sink: &mut S,
    ) -> usize {
        self.stats.bytes_received += chunk.len() as u64;
        self.framer.push(chunk);
        log::trace!(
            "Reading {} bytes. new buffer size: {}",
            chunk.len(),
            self.framer.buffered()
        );

        let mut emitted = 0;
        while let Some(next) = self.framer.next_frame() {
            let frame = match next.and_then(|body| CanFrame::decode(&body)) {
                Ok(frame) => frame,
                Err(err) => {
                    self.stats.frames_malformed += 1;
                    log::warn!("Dropping malformed {:?} frame: {}", self.framer.kind(), err);
                    continue;
                }
            };
            if self.process_frame(&frame, now, sink) {
                emitted += 1;
            }
        }
        emitted
    }

    /// Route one decoded frame. Returns `true` when a message reached `sink`.
    pub fn process_frame<S: MessageSink + ?Sized>(
        &mut self,
        frame: &CanFrame,
        now: Instant,
        sink: &mut S,
    ) -> bool {
        self.stats.frames_decoded += 1;
        let pgn = frame.pgn();
        log::trace!(
            "PGN {} source {:#04X} data {:02X?}",
            pgn,
            frame.source(),
            frame.data()
        );

        if !self.filter.allows(pgn) {
            self.stats.frames_filtered += 1;
            return false;
        }

        if !self.catalog.is_fast_packet(pgn) {
            self.stats.single_frame_messages += 1;
            sink.on_message(N2kMessage {
                pgn,
                source: frame.source(),
                payload: frame.data().to_vec(),
                fast_packet: false,
            });
            return true;
        }

        self.stats.fast_packet_fragments += 1;
        match self.engine.process(frame, now) {
            ProcessResult::MessageComplete(done) => {
                self.stats.fast_packet_messages += 1;
                sink.on_message(N2kMessage {
                    pgn: done.pgn,
                    source: done.source,
                    payload: done.payload,
                    fast_packet: true,
                });
                true
            }
            ProcessResult::FragmentConsumed => false,
            ProcessResult::Ignored(reason) => {
                self.stats.record_ignored(reason);
                false
            }
        }
    }

    /// Forget buffered bytes and all reassembly/throttle state. Counters are kept.
    pub fn reset(&mut self) {
        self.framer.reset();
        self.engine.reset();
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    pub fn engine(&self) -> &ReassemblyEngine {
        &self.engine
    }

    pub fn filter(&self) -> &PgnFilter {
        &self.filter
    }

    pub fn transport(&self) -> TransportKind {
        self.framer.kind()
    }

    /// Bytes waiting for the rest of their frame.
    pub fn buffered(&self) -> usize {
        self.framer.buffered()
    }
}

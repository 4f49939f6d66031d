//! High-level ingest components: transport framing and decoding, PGN
//! filtering, throttling, the per-connection pipeline, and the gateway
//! supervisor.
pub mod filter;
pub mod gateway;
pub mod messages;
pub mod pipeline;
pub mod throttle;
pub mod transport;

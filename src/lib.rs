//! `n2k-ingest` library: receive-side ingest for NMEA 2000 gateways. Raw
//! bytes from a USB or TCP CAN gateway are framed, decoded into CAN frames,
//! filtered by PGN, and fast-packet messages are reassembled before being
//! handed to a [`MessageSink`](protocol::transport::traits::message_sink::MessageSink).
//==================================================================================
/// Ingest configuration and validation.
pub mod config;
/// Shared constants (PGN limits, AIS PGN set).
pub mod core;
/// Error taxonomy: configuration, malformed frames, transport failures.
pub mod error;
/// Framing, decoding, filtering, reassembly, and connection supervision.
pub mod protocol;
//==================================================================================

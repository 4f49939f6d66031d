//! Error definitions shared across library modules.
//! Each type models one failure domain: setup-time configuration, malformed
//! wire frames, and the transport underneath the read loop.
use thiserror::Error;

//==================================================================================CONFIGURATION
#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Problems detected while validating the ingest configuration.
///
/// These are only ever returned from setup; steady-state frame processing
/// never produces them.
pub enum ConfigurationError {
    /// A PGN list entry could not be parsed as an integer.
    #[error("Invalid pgn value found: '{token}' in input '{input}'")]
    InvalidPgn { token: String, input: String },
    /// The value parsed but does not fit the 18-bit PGN field.
    #[error("PGN {pgn} does not fit in 18 bits")]
    PgnOutOfRange { pgn: u64 },
    /// Transport mode is neither `usb` nor `tcp`.
    #[error("mode {mode} not supported")]
    UnsupportedMode { mode: String },
    /// TCP gateway family without a known wire format.
    #[error("device_type {device} not supported")]
    UnsupportedDevice { device: String },
    /// Reassembly key mode is neither `pgn` nor `pgn_and_source`.
    #[error("reassembly_key {value} not supported")]
    UnsupportedKeyMode { value: String },
    /// A duration that must be strictly positive is zero.
    #[error("Invalid interval: {field} must be greater than zero")]
    InvalidInterval { field: &'static str },
    /// The configuration document itself is malformed.
    #[error("Configuration parse error: {0}")]
    Parse(String),
}

//==================================================================================FRAME
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// A delimited frame that cannot be turned into a [`CanFrame`].
///
/// [`CanFrame`]: crate::protocol::transport::can_frame::CanFrame
pub enum FrameError {
    /// Frame shorter than the transport's minimum viable length.
    #[error("Invalid packet length: {len} (minimum {min})")]
    TooShort { len: usize, min: usize },
    /// Type byte announces more than eight payload bytes.
    #[error("Invalid data length code: {dlc}")]
    InvalidDataLength { dlc: u8 },
    /// The frame ends before the announced payload does.
    #[error("Truncated frame: needed {needed} bytes, got {available}")]
    Truncated { needed: usize, available: usize },
}

//==================================================================================INGEST
#[derive(Error, Debug)]
/// Failures surfaced by the gateway read loop.
///
/// Only these end a read loop; the supervisor logs them and reconnects after
/// backoff.
pub enum IngestError<E: core::fmt::Debug> {
    /// The byte source reported an error mid-stream.
    #[error("Transport error: {0:?}")]
    Transport(E),
    /// Opening the connection failed.
    #[error("Connect error: {0:?}")]
    Connect(E),
    /// Opening the connection took longer than the connect timeout.
    #[error("Timeout occurred while trying to connect")]
    ConnectTimeout,
    /// No bytes arrived within the data timeout.
    #[error("No data received within {secs} seconds")]
    DataTimeout { secs: u64 },
}

//! Ingest configuration: the raw TOML model, PGN list parsing, and the
//! validation step that turns user input into the values the pipeline and the
//! gateway supervisor run with.
//!
//! ```toml
//! name = "Boat"
//! mode = "tcp"
//! ip = "192.168.0.46"
//! port = 8881
//! device_type = "ebyte"
//! pgn_exclude = "129038, 129039"
//! min_interval_ms = 5000
//! ```
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::core::{AIS_PGNS, MAX_PGN};
use crate::error::ConfigurationError;
use crate::protocol::filter::PgnFilter;
use crate::protocol::gateway::{Backoff, MAX_BACKOFF, TCP_INITIAL_BACKOFF, USB_INITIAL_BACKOFF};
use crate::protocol::transport::fast_packet::assembler::KeyMode;
use crate::protocol::transport::fast_packet::catalog::FastPacketCatalog;
use crate::protocol::transport::framer::TransportKind;

pub const DEFAULT_NAME: &str = "NMEA 2000";
pub const DEFAULT_SERIAL_PORT: &str = "/dev/ttyUSB0";
pub const DEFAULT_BAUDRATE: u32 = 2_000_000;
pub const DEFAULT_IP: &str = "192.168.0.46";
pub const DEFAULT_PORT: u16 = 8881;
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 5000;

//==================================================================================PGN_LISTS
/// Parse a comma separated PGN list such as `"129025, 129026,,"`.
///
/// Blank entries are skipped and duplicates collapse.
pub fn parse_pgn_list(input: &str) -> Result<BTreeSet<u32>, ConfigurationError> {
    let mut pgns = BTreeSet::new();
    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let value: u64 = token.parse().map_err(|_| ConfigurationError::InvalidPgn {
            token: token.to_string(),
            input: input.to_string(),
        })?;
        if value > u64::from(MAX_PGN) {
            return Err(ConfigurationError::PgnOutOfRange { pgn: value });
        }
        pgns.insert(value as u32);
    }
    Ok(pgns)
}

//==================================================================================RAW_CONFIG
/// Configuration as written by the user. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub name: String,
    /// `usb` or `tcp`.
    pub mode: String,
    pub serial_port: String,
    pub baudrate: u32,
    pub ip: String,
    pub port: u16,
    /// TCP gateway family. Only `ebyte` is known.
    pub device_type: String,
    pub pgn_include: String,
    pub pgn_exclude: String,
    pub exclude_ais: bool,
    pub min_interval_ms: u64,
    /// Extra PGNs to reassemble as fast packets.
    pub fast_packet_pgns: String,
    /// `pgn` or `pgn_and_source`.
    pub reassembly_key: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            mode: "usb".to_string(),
            serial_port: DEFAULT_SERIAL_PORT.to_string(),
            baudrate: DEFAULT_BAUDRATE,
            ip: DEFAULT_IP.to_string(),
            port: DEFAULT_PORT,
            device_type: "ebyte".to_string(),
            pgn_include: String::new(),
            pgn_exclude: String::new(),
            exclude_ais: false,
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
            fast_packet_pgns: String::new(),
            reassembly_key: "pgn".to_string(),
        }
    }
}

impl IngestConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(content).map_err(|e| ConfigurationError::Parse(e.to_string()))
    }

    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::Parse(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Render the configuration as a complete TOML document, every key
    /// spelled out. Useful as a starting template.
    pub fn to_toml_string(&self) -> Result<String, ConfigurationError> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigurationError::Parse(format!("Failed to serialize config: {}", e))
        })
    }

    /// Check every option and resolve it into runtime values.
    pub fn validate(&self) -> Result<ValidatedConfig, ConfigurationError> {
        let mode = self.mode.to_ascii_lowercase();
        let (endpoint, transport, initial_backoff) = match mode.as_str() {
            "usb" => (
                Endpoint::Usb {
                    serial_port: self.serial_port.clone(),
                    baudrate: self.baudrate,
                },
                TransportKind::Delimited,
                USB_INITIAL_BACKOFF,
            ),
            "tcp" => match self.device_type.to_ascii_lowercase().as_str() {
                "ebyte" => (
                    Endpoint::Tcp {
                        ip: self.ip.clone(),
                        port: self.port,
                    },
                    TransportKind::FixedLength,
                    TCP_INITIAL_BACKOFF,
                ),
                _ => {
                    return Err(ConfigurationError::UnsupportedDevice {
                        device: self.device_type.clone(),
                    })
                }
            },
            _ => {
                return Err(ConfigurationError::UnsupportedMode {
                    mode: self.mode.clone(),
                })
            }
        };

        let key_mode = match self.reassembly_key.to_ascii_lowercase().as_str() {
            "pgn" => KeyMode::Pgn,
            "pgn_and_source" => KeyMode::PgnAndSource,
            _ => {
                return Err(ConfigurationError::UnsupportedKeyMode {
                    value: self.reassembly_key.clone(),
                })
            }
        };

        if self.min_interval_ms == 0 {
            return Err(ConfigurationError::InvalidInterval {
                field: "min_interval_ms",
            });
        }

        let include = parse_pgn_list(&self.pgn_include)?;
        let mut exclude = parse_pgn_list(&self.pgn_exclude)?;
        if include.is_empty() && self.exclude_ais {
            exclude.extend(AIS_PGNS);
        }
        if !include.is_empty() && !exclude.is_empty() {
            log::warn!(
                "{}: pgn_include and pgn_exclude both set, the include list wins",
                self.name
            );
        }

        let catalog =
            FastPacketCatalog::well_known().with_extra(parse_pgn_list(&self.fast_packet_pgns)?);

        let validated = ValidatedConfig {
            name: self.name.clone(),
            endpoint,
            transport,
            filter: PgnFilter::new(include, exclude),
            min_interval: Duration::from_millis(self.min_interval_ms),
            catalog,
            key_mode,
            backoff: Backoff::new(initial_backoff, MAX_BACKOFF),
        };
        log::info!(
            "{}: {} via {:?}, include {:?}, exclude {:?}, min interval {} ms, key {:?}",
            validated.name,
            validated.endpoint,
            validated.transport,
            validated.filter.include(),
            validated.filter.exclude(),
            self.min_interval_ms,
            validated.key_mode
        );
        Ok(validated)
    }
}

//==================================================================================VALIDATED
/// Where the gateway lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Usb { serial_port: String, baudrate: u32 },
    Tcp { ip: String, port: u16 },
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Usb {
                serial_port,
                baudrate,
            } => write!(f, "{} @ {} baud", serial_port, baudrate),
            Endpoint::Tcp { ip, port } => write!(f, "{}:{}", ip, port),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub name: String,
    pub endpoint: Endpoint,
    pub transport: TransportKind,
    pub filter: PgnFilter,
    pub min_interval: Duration,
    pub catalog: FastPacketCatalog,
    pub key_mode: KeyMode,
    pub backoff: Backoff,
}

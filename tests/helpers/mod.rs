/// Test doubles to simulate gateway connections and the timer during
/// integration tests, plus builders for raw gateway bytes.
use n2k_ingest::protocol::transport::traits::{
    byte_source::{ByteSource, Connector},
    gateway_timer::GatewayTimer,
};
use std::collections::VecDeque;
use tokio::time::{sleep, Duration};

/// Route `log` output through the test harness; `RUST_LOG` selects the level.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockError(pub &'static str);

#[allow(dead_code)]
/// One scripted read result.
pub enum Read {
    Data(Vec<u8>),
    Fail(&'static str),
    /// Never completes.
    Stall,
}

/// In-memory byte stream replaying scripted reads, then end of stream.
pub struct MockByteSource {
    reads: VecDeque<Read>,
}

#[allow(dead_code)]
impl MockByteSource {
    pub fn new(reads: Vec<Read>) -> Self {
        Self {
            reads: reads.into(),
        }
    }

    /// Split `bytes` into reads of at most `chunk` bytes.
    pub fn chunked(bytes: &[u8], chunk: usize) -> Self {
        Self::new(
            bytes
                .chunks(chunk)
                .map(|c| Read::Data(c.to_vec()))
                .collect(),
        )
    }
}

impl ByteSource for MockByteSource {
    type Error = MockError;

    async fn read<'a>(&'a mut self, buf: &'a mut [u8]) -> Result<usize, Self::Error> {
        match self.reads.pop_front() {
            None => Ok(0),
            Some(Read::Fail(reason)) => Err(MockError(reason)),
            Some(Read::Stall) => std::future::pending().await,
            Some(Read::Data(mut data)) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                if n < data.len() {
                    self.reads.push_front(Read::Data(data.split_off(n)));
                }
                Ok(n)
            }
        }
    }
}

#[allow(dead_code)]
/// One scripted connection attempt.
pub enum Attempt {
    Open(MockByteSource),
    Refuse(&'static str),
    Hang,
}

/// Hands out scripted connections; refuses once the script runs out.
pub struct MockConnector {
    attempts: VecDeque<Attempt>,
    pub connects: usize,
}

#[allow(dead_code)]
impl MockConnector {
    pub fn new(attempts: Vec<Attempt>) -> Self {
        Self {
            attempts: attempts.into(),
            connects: 0,
        }
    }
}

impl Connector for MockConnector {
    type Source = MockByteSource;
    type Error = MockError;

    fn describe(&self) -> String {
        "mock gateway".to_string()
    }

    async fn connect(&mut self) -> Result<Self::Source, Self::Error> {
        self.connects += 1;
        match self.attempts.pop_front() {
            Some(Attempt::Open(source)) => Ok(source),
            Some(Attempt::Refuse(reason)) => Err(MockError(reason)),
            Some(Attempt::Hang) => std::future::pending().await,
            None => Err(MockError("connection refused")),
        }
    }
}

/// Timer based on `tokio::time::sleep` to drive delays in tests.
pub struct MockTimer;

impl GatewayTimer for MockTimer {
    async fn delay_ms(&mut self, millis: u64) {
        sleep(Duration::from_millis(millis)).await;
    }
}

//==================================================================================WIRE
/// 29-bit identifier for `pgn` sent by `source` at priority 2.
#[allow(dead_code)]
pub fn can_id(pgn: u32, source: u8) -> u32 {
    (2 << 26) | (pgn << 8) | source as u32
}

/// Delimiter-bounded frame as the USB gateway emits it.
#[allow(dead_code)]
pub fn delimited_frame(id: u32, data: &[u8]) -> Vec<u8> {
    let mut out = vec![0xAA, 0xE0 | data.len() as u8];
    out.extend_from_slice(&id.to_le_bytes());
    out.extend(data.iter().rev());
    out.push(0x55);
    out
}

/// Fixed 13-byte frame plus separator as the TCP gateway emits it.
#[allow(dead_code)]
pub fn fixed_frame(id: u32, data: &[u8]) -> Vec<u8> {
    let mut out = vec![0x80 | data.len() as u8];
    out.extend_from_slice(&id.to_le_bytes());
    out.extend(data.iter().rev());
    out.resize(13, 0);
    out.push(0x00);
    out
}

/// Fast-packet frames carrying `payload` with sequence `seq`, in the decoded
/// data order (payload first, control byte last).
#[allow(dead_code)]
pub fn fast_packet_frames(seq: u8, payload: &[u8]) -> Vec<Vec<u8>> {
    let mut frames = Vec::new();
    let mut first: Vec<u8> = payload.iter().take(6).copied().collect();
    first.resize(6, 0xFF);
    first.push(payload.len() as u8);
    first.push(seq << 5);
    frames.push(first);

    for (i, chunk) in payload.get(6..).unwrap_or(&[]).chunks(7).enumerate() {
        let mut frame = chunk.to_vec();
        frame.resize(7, 0xFF);
        frame.push((seq << 5) | (i as u8 + 1));
        frames.push(frame);
    }
    frames
}

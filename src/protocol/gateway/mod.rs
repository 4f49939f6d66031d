//! Connection supervision: the read loop for one connection and the
//! reconnecting supervisor around it.
//!
//! Strategy:
//! 1. Connect, giving up after [`CONNECT_TIMEOUT`].
//! 2. Reset the pipeline and read chunks until the peer closes, a read fails,
//!    or nothing arrives for [`DATA_TIMEOUT`].
//! 3. Sleep for the current backoff (doubling up to [`MAX_BACKOFF`]) and go
//!    back to 1, until the stop signal fires.
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant};
use futures_util::future::{select, Either};
use futures_util::pin_mut;

use crate::error::IngestError;
use crate::protocol::pipeline::Pipeline;
use crate::protocol::transport::traits::byte_source::{ByteSource, Connector};
use crate::protocol::transport::traits::gateway_timer::GatewayTimer;
use crate::protocol::transport::traits::message_sink::{LinkState, MessageSink};

/// Bytes requested from the source per read.
pub const READ_CHUNK_SIZE: usize = 100;
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DATA_TIMEOUT: Duration = Duration::from_secs(60);
/// Serial adapters take a while to come back after a replug.
pub const USB_INITIAL_BACKOFF: Duration = Duration::from_secs(5);
pub const TCP_INITIAL_BACKOFF: Duration = Duration::from_secs(1);
pub const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Fired once to make [`Gateway::run`] return.
pub type StopSignal = Signal<CriticalSectionRawMutex, ()>;

//==================================================================================Backoff
/// Exponential reconnect delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            current: initial,
        }
    }

    /// Delay to wait now. The following call returns twice as much, capped.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = core::cmp::min(self.current * 2, self.max);
        delay
    }

    /// Back to the initial delay after a successful connect.
    pub fn reset(&mut self) {
        self.current = self.initial;
    }

    pub fn current(&self) -> Duration {
        self.current
    }
}

//==================================================================================READ_LOOP
/// Pump `source` into `pipeline` until the peer closes the stream.
///
/// Returns `Ok(())` on end of stream. A partial frame still buffered at that
/// point is discarded on the next [`Pipeline::reset`].
pub async fn read_until_closed<B, T, S>(
    source: &mut B,
    timer: &mut T,
    pipeline: &mut Pipeline,
    sink: &mut S,
    data_timeout: Duration,
) -> Result<(), IngestError<B::Error>>
where
    B: ByteSource,
    T: GatewayTimer,
    S: MessageSink + ?Sized,
{
    let mut buf = [0u8; READ_CHUNK_SIZE];
    loop {
        let read = {
            let chunk = source.read(&mut buf);
            pin_mut!(chunk);
            let timeout = timer.delay_ms(data_timeout.as_millis());
            pin_mut!(timeout);

            match select(chunk, timeout).await {
                Either::Left((result, _)) => result.map_err(IngestError::Transport)?,
                Either::Right(_) => {
                    return Err(IngestError::DataTimeout {
                        secs: data_timeout.as_secs(),
                    })
                }
            }
        };

        if read == 0 {
            log::debug!(
                "No data to read, closing ({} bytes left in buffer)",
                pipeline.buffered()
            );
            return Ok(());
        }
        pipeline.push(&buf[..read], Instant::now(), sink);
    }
}

//==================================================================================Gateway
/// One gateway connection and the state that outlives reconnects.
pub struct Gateway<C: Connector, T: GatewayTimer> {
    name: String,
    connector: C,
    timer: T,
    pipeline: Pipeline,
    backoff: Backoff,
    connect_timeout: Duration,
    data_timeout: Duration,
    connected: bool,
}

impl<C: Connector, T: GatewayTimer> Gateway<C, T> {
    pub fn new(name: &str, connector: C, timer: T, pipeline: Pipeline, backoff: Backoff) -> Self {
        Self {
            name: name.to_string(),
            connector,
            timer,
            pipeline,
            backoff,
            connect_timeout: CONNECT_TIMEOUT,
            data_timeout: DATA_TIMEOUT,
            connected: false,
        }
    }

    pub fn with_timeouts(mut self, connect_timeout: Duration, data_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.data_timeout = data_timeout;
        self
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Keep the gateway connected until `stop` fires.
    ///
    /// Partially reassembled messages are dropped on return, never flushed.
    pub async fn run<S: MessageSink + ?Sized>(&mut self, sink: &mut S, stop: &StopSignal) {
        loop {
            let outcome = {
                let cycle = self.run_once(sink);
                pin_mut!(cycle);
                let wait = stop.wait();
                pin_mut!(wait);

                match select(cycle, wait).await {
                    Either::Left((result, _)) => Some(result),
                    Either::Right(_) => None,
                }
            };

            let stopped = match outcome {
                Some(Ok(())) => {
                    log::info!("{}: connection closed by peer", self.name);
                    false
                }
                Some(Err(err)) => {
                    log::warn!("{}: {}", self.name, err);
                    false
                }
                None => true,
            };
            self.mark_disconnected(sink);
            if stopped {
                log::info!("{}: stopped", self.name);
                return;
            }

            let delay = self.backoff.next_delay();
            log::info!("{}: will retry in {} ms", self.name, delay.as_millis());
            let sleep = self.timer.delay_ms(delay.as_millis());
            pin_mut!(sleep);
            let wait = stop.wait();
            pin_mut!(wait);
            if let Either::Right(_) = select(sleep, wait).await {
                log::info!("{}: stopped", self.name);
                return;
            }
        }
    }

    /// A single connect + read cycle, without retry.
    pub async fn run_once<S: MessageSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> Result<(), IngestError<C::Error>> {
        log::info!(
            "{}: attempting to connect to {}",
            self.name,
            self.connector.describe()
        );
        let mut source = {
            let connect = self.connector.connect();
            pin_mut!(connect);
            let timeout = self.timer.delay_ms(self.connect_timeout.as_millis());
            pin_mut!(timeout);

            match select(connect, timeout).await {
                Either::Left((Ok(source), _)) => source,
                Either::Left((Err(err), _)) => return Err(IngestError::Connect(err)),
                Either::Right(_) => return Err(IngestError::ConnectTimeout),
            }
        };

        log::info!("{}: connected to {}", self.name, self.connector.describe());
        self.backoff.reset();
        self.pipeline.reset();
        self.connected = true;
        sink.on_link_state(LinkState::Connected);

        let result = read_until_closed(
            &mut source,
            &mut self.timer,
            &mut self.pipeline,
            sink,
            self.data_timeout,
        )
        .await;
        self.mark_disconnected(sink);
        result
    }

    fn mark_disconnected<S: MessageSink + ?Sized>(&mut self, sink: &mut S) {
        if self.connected {
            self.connected = false;
            sink.on_link_state(LinkState::Disconnected);
        }
    }
}

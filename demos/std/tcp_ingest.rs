//! Connect to a TCP NMEA 2000 gateway and print every message it delivers.
//!
//! ```text
//! RUST_LOG=info cargo run --example tcp_ingest -- gateway.toml
//! ```
//!
//! Without an argument the default TCP settings (`192.168.0.46:8881`) are used.
use n2k_ingest::{
    config::{Endpoint, IngestConfig},
    protocol::{
        gateway::{Gateway, StopSignal},
        messages::N2kMessage,
        pipeline::Pipeline,
        transport::traits::{
            byte_source::{ByteSource, Connector},
            gateway_timer::GatewayTimer,
            message_sink::{LinkState, MessageSink},
        },
    },
};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::{sleep, Duration};

struct TcpSource(TcpStream);

impl ByteSource for TcpSource {
    type Error = std::io::Error;

    async fn read<'a>(&'a mut self, buf: &'a mut [u8]) -> Result<usize, Self::Error> {
        self.0.read(buf).await
    }
}

struct TcpConnector {
    addr: String,
}

impl Connector for TcpConnector {
    type Source = TcpSource;
    type Error = std::io::Error;

    fn describe(&self) -> String {
        self.addr.clone()
    }

    async fn connect(&mut self) -> Result<Self::Source, Self::Error> {
        TcpStream::connect(&self.addr).await.map(TcpSource)
    }
}

struct TokioTimer;

impl GatewayTimer for TokioTimer {
    async fn delay_ms(&mut self, millis: u64) {
        sleep(Duration::from_millis(millis)).await;
    }
}

struct PrintSink;

impl MessageSink for PrintSink {
    fn on_message(&mut self, message: N2kMessage) {
        println!(
            "PGN {:>6} src {:>3} {:>3} bytes {:02X?}",
            message.pgn,
            message.source,
            message.payload.len(),
            message.payload
        );
    }

    fn on_link_state(&mut self, state: LinkState) {
        println!("link {:?}", state);
    }
}

static STOP: StopSignal = StopSignal::new();

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let raw = match std::env::args().nth(1) {
        Some(path) => IngestConfig::load(path)?,
        None => {
            let defaults = IngestConfig {
                mode: "tcp".to_string(),
                ..IngestConfig::default()
            };
            let template = defaults.to_toml_string()?;
            println!("No config file given, using:\n{}", template);
            defaults
        }
    };
    let config = raw.validate()?;
    let Endpoint::Tcp { ip, port } = &config.endpoint else {
        return Err(format!("{} is not a TCP endpoint", config.endpoint).into());
    };

    let connector = TcpConnector {
        addr: format!("{}:{}", ip, port),
    };
    let mut gateway = Gateway::new(
        &config.name,
        connector,
        TokioTimer,
        Pipeline::from_config(&config),
        config.backoff,
    );

    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            STOP.signal(());
        }
    });

    gateway.run(&mut PrintSink, &STOP).await;
    println!("{:#?}", gateway.pipeline().stats());
    Ok(())
}

//! Replay a raw gateway capture file through the pipeline and report what
//! came out.
//!
//! ```text
//! cargo run --example replay_capture -- capture.bin [usb|tcp]
//! ```
use std::collections::BTreeMap;

use embassy_time::{Duration, Instant};
use n2k_ingest::{
    config::IngestConfig,
    protocol::{
        gateway::READ_CHUNK_SIZE,
        messages::N2kMessage,
        pipeline::{MessageRate, Pipeline},
    },
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or("usage: replay_capture <capture> [usb|tcp]")?;
    let mode = args.next().unwrap_or_else(|| "usb".to_string());

    let config = IngestConfig {
        mode,
        ..IngestConfig::default()
    }
    .validate()?;
    let mut pipeline = Pipeline::from_config(&config);
    let bytes = std::fs::read(&path)?;

    // Pretend each read arrives 10 ms after the previous one.
    let start = Instant::from_secs(0);
    let mut now = start;
    let mut per_pgn: BTreeMap<u32, usize> = BTreeMap::new();
    let mut sink = |message: N2kMessage| *per_pgn.entry(message.pgn).or_default() += 1;
    for chunk in bytes.chunks(READ_CHUNK_SIZE) {
        pipeline.push(chunk, now, &mut sink);
        now += Duration::from_millis(10);
    }

    let stats = pipeline.stats();
    let mut rate = MessageRate::new(0, start);
    println!("{} bytes from {}", bytes.len(), path);
    println!("{:#?}", stats);
    if let Some(per_minute) = rate.sample(stats.messages_emitted(), now) {
        println!("{} messages/min", per_minute);
    }
    for (pgn, count) in &per_pgn {
        println!("PGN {:>6}: {}", pgn, count);
    }
    Ok(())
}

//! Configuration-driven ingest of a recorded TCP gateway stream, with field
//! decoding at the sink.
mod helpers;

use embassy_time::{Duration, Instant};
use helpers::{can_id, fast_packet_frames, fixed_frame, init_logging};
use n2k_ingest::{
    config::IngestConfig,
    protocol::{
        messages::{DecodedField, DecodingSink, FieldDecoder, FieldValue, N2kMessage},
        pipeline::{MessageRate, Pipeline},
        transport::framer::TransportKind,
    },
};

const VESSEL_HEADING: u32 = 127250;
const GNSS_POSITION: u32 = 129029;
const AIS_CLASS_A_POSITION: u32 = 129038;

/// Knows only the heading field of PGN 127250.
struct HeadingDecoder;

impl FieldDecoder for HeadingDecoder {
    fn decode(&self, pgn: u32, payload: &[u8]) -> Option<Vec<DecodedField>> {
        if pgn != VESSEL_HEADING {
            return None;
        }
        let raw = u16::from_le_bytes([*payload.get(1)?, *payload.get(2)?]);
        let value = if raw == 0xFFFF {
            FieldValue::Absent
        } else {
            FieldValue::Numeric(raw as f64 * 0.0001)
        };
        Some(vec![DecodedField {
            id: "heading".to_string(),
            name: "Heading".to_string(),
            value,
            unit: Some("rad".to_string()),
        }])
    }
}

fn recorded_stream() -> Vec<u8> {
    let mut bytes = Vec::new();
    // AIS position report, excluded by configuration.
    for data in fast_packet_frames(0, &[0x11; 27]) {
        bytes.extend(fixed_frame(can_id(AIS_CLASS_A_POSITION, 0x10), &data));
    }
    // Heading 1.5708 rad.
    bytes.extend(fixed_frame(
        can_id(VESSEL_HEADING, 0x07),
        &[0x00, 0x5C, 0x3D, 0xFF, 0x7F, 0xFF, 0x7F, 0xFD],
    ));
    // GNSS position split over three frames.
    let gnss: Vec<u8> = (1..=20).collect();
    for data in fast_packet_frames(2, &gnss) {
        bytes.extend(fixed_frame(can_id(GNSS_POSITION, 0x2A), &data));
    }
    // Heading not available.
    bytes.extend(fixed_frame(
        can_id(VESSEL_HEADING, 0x07),
        &[0x01, 0xFF, 0xFF, 0xFF, 0x7F, 0xFF, 0x7F, 0xFD],
    ));
    bytes
}

fn tcp_pipeline() -> Pipeline {
    let config = IngestConfig::from_toml_str(
        r#"
        name = "Bridge"
        mode = "tcp"
        ip = "127.0.0.1"
        exclude_ais = true
        "#,
    )
    .unwrap()
    .validate()
    .unwrap();
    assert_eq!(config.transport, TransportKind::FixedLength);
    Pipeline::from_config(&config)
}

#[test]
fn test_recorded_tcp_stream() {
    init_logging();
    let mut pipeline = tcp_pipeline();
    let mut headings: Vec<(u8, FieldValue)> = Vec::new();
    let mut sink = DecodingSink::new(HeadingDecoder, |msg: &N2kMessage, fields: Vec<DecodedField>| {
        for field in fields {
            headings.push((msg.source, field.value));
        }
    });

    let now = Instant::from_secs(100);
    for chunk in recorded_stream().chunks(5) {
        pipeline.push(chunk, now, &mut sink);
    }
    let undecoded = sink.undecoded();
    drop(sink);

    assert_eq!(headings.len(), 2);
    assert_eq!(headings[0].0, 0x07);
    let heading = headings[0].1.as_f64().unwrap();
    assert!((heading - 1.5708).abs() < 1e-9);
    assert!(headings[1].1.is_absent());
    assert_eq!(headings[1].1.to_string(), "n/a");

    // GNSS reached the sink but has no field definition here.
    assert_eq!(undecoded, 1);

    let stats = pipeline.stats();
    assert_eq!(stats.frames_decoded, 4 + 1 + 3 + 1);
    assert_eq!(stats.frames_filtered, 4);
    assert_eq!(stats.frames_malformed, 0);
    assert_eq!(stats.single_frame_messages, 2);
    assert_eq!(stats.fast_packet_messages, 1);
    assert_eq!(stats.messages_emitted(), 3);
    assert_eq!(pipeline.buffered(), 0);
}

#[test]
fn test_message_rate_from_stats() {
    init_logging();
    let mut pipeline = tcp_pipeline();
    let start = Instant::from_secs(0);
    let mut rate = MessageRate::new(pipeline.stats().messages_emitted(), start);
    let mut out: Vec<N2kMessage> = Vec::new();

    pipeline.push(&recorded_stream(), start, &mut out);
    let per_minute = rate.sample(
        pipeline.stats().messages_emitted(),
        start + Duration::from_secs(10),
    );
    assert_eq!(per_minute, Some(18));
}

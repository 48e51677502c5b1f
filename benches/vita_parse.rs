// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use flexradio::vita::{self, ScratchBuffers};

fn meter_packet(count: usize) -> Vec<u8> {
    let mut buf = vec![0u8; 16];
    buf[0] = 0x08; // classIdPresent, no trailer
    buf[12..16].copy_from_slice(&0x0000_8002u32.to_be_bytes());
    for i in 0..count {
        buf.extend_from_slice(&(i as u16).to_be_bytes());
        buf.extend_from_slice(&((i as i16) - 64).to_be_bytes());
    }
    while buf.len() < 28 {
        buf.extend_from_slice(&[0xFF, 0xFF, 0x00, 0x00]);
    }
    let total_words = (buf.len() / 4) as u16;
    buf[2..4].copy_from_slice(&total_words.to_be_bytes());
    buf
}

fn panadapter_packet(bins: usize) -> Vec<u8> {
    let mut buf = vec![0u8; 16];
    buf[0] = 0x08;
    buf[12..16].copy_from_slice(&0x0000_8003u32.to_be_bytes());
    buf.extend_from_slice(&0u16.to_be_bytes()); // starting_bin
    buf.extend_from_slice(&(bins as u16).to_be_bytes()); // bins_in_frame
    buf.extend_from_slice(&2u16.to_be_bytes()); // bin_size
    buf.extend_from_slice(&(bins as u16).to_be_bytes()); // total_bins
    buf.extend_from_slice(&1u32.to_be_bytes()); // frame
    for i in 0..bins {
        buf.extend_from_slice(&((i % 4096) as u16).to_be_bytes());
    }
    while buf.len() < 28 {
        buf.extend_from_slice(&[0, 0, 0, 0]);
    }
    let total_words = (buf.len() / 4) as u16;
    buf[2..4].copy_from_slice(&total_words.to_be_bytes());
    buf
}

fn criterion_benchmark(c: &mut Criterion) {
    let meter = meter_packet(8);
    let pan = panadapter_packet(4096);

    c.bench_function("parse meter packet", |b| {
        let mut scratch = ScratchBuffers::default();
        b.iter(|| vita::parse(black_box(&meter), &mut scratch).unwrap())
    });

    c.bench_function("parse panadapter frame (4096 bins)", |b| {
        let mut scratch = ScratchBuffers::default();
        b.iter(|| vita::parse(black_box(&pan), &mut scratch).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

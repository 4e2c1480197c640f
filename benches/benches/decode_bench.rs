//! Бенчмарки декодера reamp.
//!
//! Запуск: cargo bench --package reamp-benchmark

use std::{hint::black_box, io::Cursor};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use reamp_core::{
    read_all_records, FileHeader, FileHeaderExt, ReampReader, REAMP_HEADER_SIZE, REAMP_VERSION,
};

const RECORDS: usize = 100_000;

/// Синтетический файл: монотонный инкремент, терминатор в конце.
fn synthetic_file(channel_count: u8) -> Vec<u8> {
    let mut raw = vec![0u8; REAMP_HEADER_SIZE];
    raw[0..2].copy_from_slice(&REAMP_VERSION.to_le_bytes());
    raw[2..4].copy_from_slice(&(REAMP_HEADER_SIZE as i16).to_le_bytes());
    raw[8] = channel_count;
    raw[10..12].copy_from_slice(&100i16.to_le_bytes());
    raw[0x1F8..0x200].copy_from_slice(&1_704_067_200_000u64.to_le_bytes());

    let mut push = |inc: f64| {
        raw.extend_from_slice(&inc.to_le_bytes());
        for ch in 0..channel_count {
            raw.extend_from_slice(&(inc * 0.5 + ch as f64).to_le_bytes());
        }
    };

    for i in 0..RECORDS {
        push(i as f64 * 10.0);
    }
    push((RECORDS - 1) as f64 * 10.0);

    raw
}

fn bench_header_parse(c: &mut Criterion) {
    let raw = synthetic_file(4);
    let header = &raw[..REAMP_HEADER_SIZE];

    c.bench_function("header_parse", |b| {
        b.iter(|| FileHeader::parse(black_box(header)).unwrap())
    });
}

fn bench_record_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_stream");

    for &channels in &[1u8, 8, 64] {
        let raw = synthetic_file(channels);
        group.throughput(Throughput::Bytes(raw.len() as u64));
        group.bench_with_input(BenchmarkId::new("channels", channels), &raw, |b, raw| {
            b.iter(|| {
                let mut reader = ReampReader::new(Cursor::new(black_box(raw.as_slice()))).unwrap();
                let records = read_all_records(&mut reader).unwrap();
                assert_eq!(records.len(), RECORDS);
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_header_parse, bench_record_stream);
criterion_main!(benches);

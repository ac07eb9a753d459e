//! Aggregation, resampling and partition codec benchmarks.
//!
//! Run with: `cargo bench --package clibra-bench`

use chrono::NaiveDate;
use clibra_aggregate::{aggregate_trades, resample};
use clibra_bench::{synthetic_candles, synthetic_day};
use clibra_format::{decode_partition, encode_partition};
use clibra_types::Interval;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
}

fn aggregate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_trades");

    for trades in [10_000usize, 100_000, 1_000_000] {
        let day = synthetic_day(bench_date(), trades);
        group.throughput(Throughput::Elements(trades as u64));
        group.bench_with_input(BenchmarkId::from_parameter(trades), &day, |b, day| {
            b.iter(|| aggregate_trades(black_box(day)));
        });
    }

    group.finish();
}

fn resample_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("resample");
    let candles = synthetic_candles(bench_date(), 500_000);
    group.throughput(Throughput::Elements(candles.len() as u64));

    for seconds in [60u64, 3_600, 86_400] {
        let interval = Interval::from_secs(seconds).expect("non-zero interval");
        group.bench_with_input(BenchmarkId::from_parameter(seconds), &interval, |b, interval| {
            b.iter(|| resample(black_box(&candles), *interval));
        });
    }

    group.finish();
}

fn partition_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition");
    group.sample_size(20);

    let candles = synthetic_candles(bench_date(), 200_000);
    let encoded = encode_partition(&candles).expect("encode");
    group.throughput(Throughput::Elements(candles.len() as u64));

    group.bench_function("encode", |b| {
        b.iter(|| encode_partition(black_box(&candles)).expect("encode"));
    });
    group.bench_function("decode", |b| {
        b.iter(|| decode_partition(black_box(&encoded)).expect("decode"));
    });

    group.finish();
}

criterion_group!(benches, aggregate_benchmark, resample_benchmark, partition_benchmark);
criterion_main!(benches);

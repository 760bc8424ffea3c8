//! crates/logging/benches/render_benchmark.rs
//!
//! Benchmarks for pattern rendering, printf substitution and the filtered
//! write path.
//!
//! Run with: `cargo bench -p logging`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use time::macros::datetime;

use logging::format::{render_at, truncate_message};
use logging::printf::{Arg, sprintf};
use logging::{Level, Location, LogConfig, Logger, Pattern, Record};

const LOCATION: Location = Location::new("src/disk.rs", 42, "app::disk::poll");

/// Benchmark rendering a record through patterns of increasing size.
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let timestamp = datetime!(2024-03-05 07:08:09.123 UTC);

    for (name, text) in [
        ("message_only", "%m"),
        ("default", "[%T] [%L] [%M] %m"),
        ("everything", "%c[%T|%t] %L/%l %M %F:%n %f%C %m %%"),
    ] {
        let pattern = Pattern::parse(text).unwrap();
        let record = Record::new(Level::Warn, Some("disk"), LOCATION, "disk at 87% capacity");
        group.bench_with_input(BenchmarkId::new("pattern", name), &pattern, |b, pattern| {
            b.iter(|| black_box(render_at(pattern, black_box(&record), 256, true, timestamp)));
        });
    }

    group.finish();
}

/// Benchmark message truncation for messages around the limit.
fn bench_truncate(c: &mut Criterion) {
    let mut group = c.benchmark_group("truncate");

    for size in [64, 256, 1024, 4096] {
        let message = "é".repeat(size / 2);
        group.throughput(Throughput::Bytes(message.len() as u64));
        group.bench_with_input(BenchmarkId::new("utf8", size), &message, |b, message| {
            b.iter(|| black_box(truncate_message(black_box(message), 256)));
        });
    }

    group.finish();
}

/// Benchmark C-style substitution.
fn bench_sprintf(c: &mut Criterion) {
    let mut group = c.benchmark_group("sprintf");
    let args = [Arg::Int(87), Arg::Str("sda1"), Arg::Float(3.25), Arg::Uint(0xdead_beef)];

    group.bench_function("mixed", |b| {
        b.iter(|| black_box(sprintf(black_box("%s at %3d%% (%.2f) [%#010x]"), &args)));
    });

    group.finish();
}

/// Benchmark the write path with and without filtering, no backends attached.
fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");
    let logger = Logger::new();
    logger
        .init(
            LogConfig::default()
                .with_format("[%L] %m")
                .with_module_level("quiet", Level::Error),
        )
        .unwrap();

    group.bench_function("filtered", |b| {
        b.iter(|| {
            logger.write(
                Level::Debug,
                Some("quiet"),
                LOCATION,
                format_args!("value {}", black_box(7)),
            )
        });
    });

    group.bench_function("emitted", |b| {
        b.iter(|| {
            logger.write(
                Level::Warn,
                Some("loud"),
                LOCATION,
                format_args!("value {}", black_box(7)),
            )
        });
    });

    group.finish();
}

criterion_group!(benches, bench_render, bench_truncate, bench_sprintf, bench_write);
criterion_main!(benches);

//! Resolver hot-path benchmarks.
//!
//! Run with: `cargo bench --package marketdata-dates`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use marketdata_dates::{parse_interval, DateInput, Resolver};

fn inputs() -> Vec<(&'static str, DateInput)> {
    vec![
        ("unix-seconds", DateInput::from(1_617_181_723_i64)),
        ("unix-millis", DateInput::from(1_617_181_723_000_i64)),
        ("serial", DateInput::from(44_197.5)),
        ("iso-date", DateInput::from("2024-05-17")),
        ("iso-nanos", DateInput::from("2024-05-17T09:30:00.123456789")),
        ("rfc3339", DateInput::from("2024-05-17T09:30:00Z")),
        ("rfc1123", DateInput::from("Fri, 17 May 2024 09:30:00 EST")),
        ("keyword", DateInput::from("yesterday")),
    ]
}

fn resolve_benchmark(c: &mut Criterion) {
    let resolver = Resolver::new(chrono_tz::America::New_York);
    let mut group = c.benchmark_group("resolve");

    for (name, input) in inputs() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, input| {
            b.iter(|| resolver.resolve_input(black_box(input)))
        });
    }

    group.finish();
}

fn date_keys_benchmark(c: &mut Criterion) {
    let resolver = Resolver::new(chrono_tz::UTC);
    let range = resolver
        .calendar_range("2000-01-01", "2024-12-31")
        .expect("valid range");

    c.bench_function("date_keys/weeks", |b| {
        b.iter(|| black_box(&range).generate_date_keys("weeks"))
    });
}

fn interval_benchmark(c: &mut Criterion) {
    c.bench_function("interval/spelled", |b| {
        b.iter(|| parse_interval(black_box("15 minutes")))
    });
}

criterion_group!(benches, resolve_benchmark, date_keys_benchmark, interval_benchmark);
criterion_main!(benches);

use std::hint::black_box;

use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use time_slice::{Duration, FixedClock, RangeOptions, SliceRange};

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2019, 1, 6, 17, 44, 0).unwrap())
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_duration", |b| {
        b.iter(|| Duration::parse(black_box("15mo")))
    });
}

fn bench_construct(c: &mut Criterion) {
    c.bench_function("construct_from_to_text", |b| {
        b.iter(|| {
            SliceRange::with_clock(
                black_box("5m"),
                RangeOptions::new()
                    .from("2019-01-06 12:00")
                    .to("2019-01-06 17:35"),
                clock(),
            )
        })
    });
}

fn bench_iterate(c: &mut Criterion) {
    let range =
        SliceRange::with_clock("1m", RangeOptions::new().length(10_000), clock()).unwrap();

    c.bench_function("iterate_10k", |b| {
        b.iter(|| black_box(&range).iter().count())
    });
    c.bench_function("position_lookup", |b| {
        let at = Utc.with_ymd_and_hms(2019, 1, 6, 12, 30, 15).unwrap();
        b.iter(|| black_box(&range).position(black_box(at)))
    });
}

criterion_group!(benches, bench_parse, bench_construct, bench_iterate);
criterion_main!(benches);

//! Benchmarks for cursor encoding and page building.
//!
//! Run with: cargo bench -p mik-keyset

use chrono::{DateTime, FixedOffset};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mik_keyset::prelude::*;
use mik_keyset::sql::{Operator, Value, simple};
use mik_keyset::{Seek, SeekBound};
use std::hint::black_box;

// =============================================================================
// Cursor Codec Benchmarks
// =============================================================================

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let ints = CursorCodec::<i64, i64>::new();
    let cursor = ints.encode(&1_700_000_000, &42);
    group.bench_function("encode_int64", |b| {
        b.iter(|| ints.encode(black_box(&1_700_000_000), black_box(&42)))
    });
    group.bench_function("decode_int64", |b| b.iter(|| ints.decode(black_box(&cursor))));

    let text = CursorCodec::<String, i32>::new();
    for (name, len) in [("short", 8), ("long", 256)] {
        let order = "x".repeat(len);
        let cursor = text.encode(&order, &7);
        group.bench_with_input(BenchmarkId::new("decode_text", name), &cursor, |b, s| {
            b.iter(|| text.decode(black_box(s)))
        });
    }

    let dates = CursorCodec::<DateTime<FixedOffset>, i64>::new();
    let when = DateTime::parse_from_rfc3339("2024-03-09T12:00:05.25+02:00").unwrap();
    let cursor = dates.encode(&when, &42);
    group.bench_function("decode_date_offset", |b| {
        b.iter(|| dates.decode(black_box(&cursor)))
    });

    let dynamic = KeyCodec::resolve("date_offset", "int64").unwrap();
    group.bench_function("decode_resolved", |b| {
        b.iter(|| dynamic.decode(black_box(&cursor)))
    });

    group.finish();
}

// =============================================================================
// Engine Benchmarks
// =============================================================================

fn bench_paginate(c: &mut Criterion) {
    let mut group = c.benchmark_group("paginate");

    let rows: Vec<(i32, i64)> = (0..10_000).map(|i| (i % 97, i64::from(i))).collect();
    let codec = CursorCodec::<i32, i64>::new();
    let config = PageConfig::default();
    let middle = codec.encode(&48, &5_000);

    for (name, params) in [
        ("first_page", PageParams::new().first(20)),
        ("after_cursor", PageParams::new().first(20).after(middle.clone())),
        (
            "before_cursor_edges",
            PageParams::new().last(20).before(middle).with_edges(true),
        ),
    ] {
        group.bench_with_input(BenchmarkId::new("slice_10k", name), &params, |b, params| {
            let source = SliceSource::ascending(&rows);
            b.iter(|| {
                paginate_with(
                    &config,
                    &source,
                    |r: &(i32, i64)| r.0,
                    |r: &(i32, i64)| r.1,
                    &codec,
                    black_box(params),
                )
            })
        });
    }

    group.finish();
}

// =============================================================================
// Seek SQL Benchmarks
// =============================================================================

fn bench_seek_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("seek_sql");

    let seek = SqlSeek::new(Postgres, "posts", "score", "id")
        .dir(SortDir::Desc)
        .fields(&["id", "title", "score"])
        .filter(simple("published", Operator::Eq, Value::Bool(true)));
    let order = |r: &(i32, i64)| r.0;
    let key = |r: &(i32, i64)| r.1;

    group.bench_function("select_bounded", |b| {
        b.iter(|| {
            let query = SeekQuery::<(i32, i64), i32, i64>::new(seek.sort_dir(), 21, &order, &key)
                .with_bound(SeekBound {
                    side: Seek::After,
                    order: black_box(48),
                    key: black_box(5_000),
                });
            seek.select(&query)
        })
    });
    group.bench_function("count", |b| b.iter(|| seek.count()));

    group.finish();
}

criterion_group!(benches, bench_codec, bench_paginate, bench_seek_sql);

criterion_main!(benches);

//! Parse, render, navigation and query benchmarks.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vivid_core::{parse, Json, Style};

/// A media info document with `streams` entries.
fn sample_document(streams: usize) -> String {
    let doc = Json::object();
    doc.get("format").set("filename", "clip.mp4").unwrap();
    doc.get("format").set("nb_streams", streams).unwrap();
    for i in 0..streams {
        let stream = doc.get("streams").at(i as i64);
        stream.set("index", i).unwrap();
        stream.set("codec_name", if i % 2 == 0 { "h264" } else { "aac" }).unwrap();
        stream.set("bit_rate", 128_000.5 * i as f64).unwrap();
        stream.get("tags").set("language", "eng").unwrap();
        stream.get("disposition").set("default", i == 0).unwrap();
    }
    doc.to_compact_string()
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for streams in [4usize, 64, 512] {
        let text = sample_document(streams);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(streams), &text, |b, text| {
            b.iter(|| parse(black_box(text)).unwrap());
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let doc = parse(&sample_document(512)).unwrap();
    for style in [Style::Compact, Style::Indented] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{style:?}")),
            &style,
            |b, style| {
                b.iter(|| black_box(&doc).render(*style));
            },
        );
    }
    group.finish();
}

fn bench_navigate(c: &mut Criterion) {
    let doc = parse(&sample_document(512)).unwrap();
    c.bench_function("navigate/read_chain", |b| {
        b.iter(|| {
            black_box(&doc)
                .get("streams")
                .at(-1)
                .get("tags")
                .get("language")
                .as_string()
        });
    });
    c.bench_function("navigate/vivify_chain", |b| {
        b.iter(|| {
            let fresh = Json::object();
            fresh.get("a").at(3).get("b").set("c", 1).unwrap();
            fresh
        });
    });
}

fn bench_query(c: &mut Criterion) {
    let doc = parse(&sample_document(512)).unwrap();
    c.bench_function("query/find_all", |b| {
        b.iter(|| black_box(&doc).find_all("language").count());
    });
    c.bench_function("query/find_where", |b| {
        b.iter(|| black_box(&doc).find_where(|v| v.as_double_or(0.0) > 1e7));
    });
}

criterion_group!(benches, bench_parse, bench_render, bench_navigate, bench_query);
criterion_main!(benches);

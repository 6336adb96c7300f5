// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

use criterion::{Criterion, criterion_group, criterion_main};
use yaml_codec::{compose_str, emit_to_string};

const SMALL_DOC: &str = "\
name: benchmark
count: 42
enabled: true
items:
  - alpha
  - beta
  - gamma
nested:
  key: value
  flow: {a: 1, b: 2}
";

fn large_doc() -> String {
    let mut doc = String::from("records:\n");
    for i in 0..500 {
        doc.push_str(&format!(
            "  - id: {i}\n    name: record-{i}\n    tags: [x, y, z]\n    score: {}.5\n",
            i % 100
        ));
    }
    doc
}

pub fn benchmark_compose(c: &mut Criterion) {
    c.bench_function("compose_small", |b| {
        b.iter(|| compose_str(SMALL_DOC).expect("compose"))
    });
    let doc = large_doc();
    let mut group = c.benchmark_group("sample-size-20");
    group.sample_size(20);
    group.bench_function("compose_large", |b| {
        b.iter(|| compose_str(&doc).expect("compose"))
    });
    group.finish();
}

pub fn benchmark_emit(c: &mut Criterion) {
    let document = compose_str(SMALL_DOC).expect("compose").expect("document");
    c.bench_function("emit_small", |b| {
        b.iter(|| emit_to_string(&document).expect("emit"))
    });
}

pub fn benchmark_round_trip(c: &mut Criterion) {
    c.bench_function("round_trip_small", |b| {
        b.iter(|| {
            let document = compose_str(SMALL_DOC).expect("compose").expect("document");
            emit_to_string(&document).expect("emit")
        })
    });
}

criterion_group!(benches, benchmark_compose, benchmark_emit, benchmark_round_trip);
criterion_main!(benches);

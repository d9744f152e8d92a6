//! Criterion benchmarks for snap rounding.
//! Focus sizes: n in {10, 100, 300}; scales 1 and 1000 over a 100×100 field.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p noding

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use noding::api::{
    draw_linework, to_segment_strings, LineworkKind, Noder, ReplayToken, SegmentString,
    SnapRoundingNoder,
};

fn input(kind: LineworkKind, n: usize, seed: u64) -> Vec<SegmentString<usize>> {
    let lines = draw_linework(kind, n, ReplayToken::new(seed, 0));
    to_segment_strings(lines.into_iter().enumerate().map(|(i, l)| (l, i))).unwrap()
}

fn bench_snapround(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapround");
    for &n in &[10usize, 100, 300] {
        for &scale in &[1.0f64, 1000.0] {
            let id = format!("segments_s{scale}");
            group.bench_with_input(BenchmarkId::new(id, n), &n, |b, &n| {
                let noder = SnapRoundingNoder::new(scale).unwrap();
                b.iter_batched(
                    || input(LineworkKind::Segments, n, 51),
                    |strings| {
                        let _out = noder.node(strings).unwrap();
                    },
                    BatchSize::SmallInput,
                )
            });
        }

        group.bench_with_input(BenchmarkId::new("grid_s1", n), &n, |b, &n| {
            let noder = SnapRoundingNoder::new(1.0).unwrap();
            b.iter_batched(
                || input(LineworkKind::Grid, n, 52),
                |strings| {
                    let _out = noder.node(strings).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_snapround);
criterion_main!(benches);

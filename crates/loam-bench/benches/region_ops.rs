//! Criterion micro-benchmarks for region copies and spatial queries.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use loam_bench::{reference_map, stress_map};
use loam_map::{region, Map, Point, Rect};

fn bench_spatial_queries(c: &mut Criterion) {
    let map = stress_map(42);
    let rect = Rect::new(10, 10, 60, 60);

    c.bench_function("elements_in_50x50", |b| {
        b.iter(|| black_box(&map).elements_in(rect).count())
    });

    c.bench_function("tiles_in_50x50", |b| {
        b.iter(|| black_box(&map).tiles_in(rect).map(|(_, _, t)| t as u64).sum::<u64>())
    });
}

fn bench_region_copy(c: &mut Criterion) {
    let src = reference_map(42);
    let source = Rect::new(0, 0, 23, 23);
    let anchors = [Point::new(24, 24)];

    c.bench_function("copy_region_24x24", |b| {
        b.iter(|| {
            let mut dst = Map::new(8, 8);
            region::copy_region(black_box(&src), source, &mut dst, &anchors, false);
            dst
        })
    });

    c.bench_function("copy_region_24x24_with_clear", |b| {
        b.iter(|| {
            let mut dst = reference_map(7);
            region::copy_region(black_box(&src), source, &mut dst, &anchors, true);
            dst
        })
    });
}

criterion_group!(benches, bench_spatial_queries, bench_region_copy);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use migratrack::{
    frames::{
        projector::{project_unindexed, FrameProjector},
        NormalizedPoint,
    },
    palette::SpeciesPalette,
};

const SPECIES: [&str; 6] = [
    "Anser anser",
    "Ciconia ciconia",
    "Ciconia nigra",
    "Grus grus",
    "Larus fuscus",
    "Milvus milvus",
];

/// Deterministic pseudo-random point cloud over a whole year.
fn make_points(n: usize) -> Vec<NormalizedPoint> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 33) as u32
    };
    (0..n)
        .map(|i| NormalizedPoint {
            track_id: (i / 50) as u32,
            species: SPECIES[next() as usize % SPECIES.len()].to_string(),
            longitude: f64::from(next() % 600) / 10.0 - 20.0,
            latitude: f64::from(next() % 400) / 10.0 + 20.0,
            day: next() % 366 + 1,
        })
        .collect()
}

fn bench_projection(c: &mut Criterion) {
    let palette = SpeciesPalette::assign(SPECIES);
    let mut group = c.benchmark_group("project_one_year");

    for n in [1_000usize, 20_000] {
        let points = make_points(n);

        group.bench_with_input(BenchmarkId::new("day_buckets", n), &points, |b, points| {
            b.iter(|| {
                let projector = FrameProjector::new(points, &palette, 30, 2020).unwrap();
                let total: usize = projector.frames().map(|f| f.point_count()).sum();
                black_box(total)
            })
        });

        group.bench_with_input(BenchmarkId::new("unindexed", n), &points, |b, points| {
            b.iter(|| {
                let total: usize = (1..=366)
                    .map(|day| project_unindexed(points, &palette, 30, 2020, day).point_count())
                    .sum();
                black_box(total)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_projection);
criterion_main!(benches);

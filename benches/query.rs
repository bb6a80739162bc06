use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kd_index::kdtree::KdTreeBuilder;
use kd_index::Metric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const NUM_POINTS: usize = 10_000;
const DIMS: usize = 3;

fn generate_points(n: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n * DIMS).map(|_| rng.gen_range(0.0..1000.0)).collect()
}

fn construction(c: &mut Criterion) {
    let points = generate_points(NUM_POINTS);

    c.bench_function("build 10k points, 3 dims", |b| {
        b.iter(|| {
            KdTreeBuilder::new(black_box(&points), DIMS)
                .leaf_size(16)
                .finish()
                .unwrap()
        });
    });
}

fn queries(c: &mut Criterion) {
    let points = generate_points(NUM_POINTS);
    let tree = KdTreeBuilder::new(&points, DIMS)
        .leaf_size(16)
        .finish()
        .unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let query_points: Vec<Vec<f64>> = (0..100)
        .map(|_| (0..DIMS).map(|_| rng.gen_range(0.0..1000.0)).collect())
        .collect();

    c.bench_function("knn n=10", |b| {
        let mut i = 0;
        b.iter(|| {
            let q = &query_points[i % query_points.len()];
            i += 1;
            tree.nearest_neighbors(black_box(q), 10, Metric::SquaredEuclidean)
                .unwrap()
        });
    });

    c.bench_function("range r=25", |b| {
        let mut i = 0;
        let radii = [25.0; DIMS];
        b.iter(|| {
            let q = &query_points[i % query_points.len()];
            i += 1;
            tree.range(black_box(q), &radii, Metric::SquaredEuclidean)
                .unwrap()
        });
    });
}

criterion_group!(benches, construction, queries);
criterion_main!(benches);

//! Benchmarks for geo crate distance calculations.

use bitzy_geo::{distance_km, is_serviceable, Coordinate, ServiceArea};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn create_test_points(count: usize) -> Vec<Coordinate> {
    (0..count)
        .map(|i| {
            // Grid around Pune
            let lat = 18.4 + (i as f64 * 0.001) % 0.4;
            let lon = 73.6 + (i as f64 * 0.001) % 0.4;
            Coordinate::new(lat, lon)
        })
        .collect()
}

fn bench_single_distance(c: &mut Criterion) {
    let akurdi = Coordinate::new(18.6400, 73.8040);
    let mumbai = Coordinate::new(19.0760, 72.8777);

    c.bench_function("haversine_single", |b| {
        b.iter(|| distance_km(black_box(&akurdi), black_box(&mumbai)))
    });
}

fn bench_serviceable_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("serviceable_scan");
    let area = ServiceArea::new(Coordinate::new(18.6400, 73.8040), 10.0).unwrap();

    for size in [10, 100, 1000, 10000].iter() {
        let points = create_test_points(*size);

        group.bench_with_input(BenchmarkId::new("sequential", size), size, |b, _| {
            b.iter(|| {
                black_box(&points)
                    .iter()
                    .filter(|p| is_serviceable(p, &area))
                    .count()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_distance, bench_serviceable_scan);
criterion_main!(benches);

//! Benchmarks for distance calculations and radius filtering.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use opendonate_geo::{haversine_distance, nearest, resolve, within_radius, Coordinate};

fn create_points(count: usize) -> Vec<Coordinate> {
    (0..count)
        .map(|i| {
            // Grid over the Seoul metropolitan area
            let lat = 37.4 + (i as f64 * 0.001) % 0.3;
            let lng = 126.8 + (i as f64 * 0.0013) % 0.4;
            Coordinate::new(lat, lng)
        })
        .collect()
}

fn bench_single_distance(c: &mut Criterion) {
    let gangnam = Coordinate::new(37.5665, 127.0018);
    let gwangju = Coordinate::new(35.1595, 126.8526);

    c.bench_function("haversine_single", |b| {
        b.iter(|| haversine_distance(black_box(&gangnam), black_box(&gwangju)))
    });
}

fn bench_radius_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("within_radius");
    let origin = Coordinate::new(37.5665, 127.0018);

    for size in [10, 100, 1000, 10000].iter() {
        let points = create_points(*size);

        group.bench_with_input(BenchmarkId::new("filter", size), size, |b, _| {
            b.iter(|| within_radius(black_box(&points), black_box(&origin), 5.0))
        });
        group.bench_with_input(BenchmarkId::new("nearest_10", size), size, |b, _| {
            b.iter(|| nearest(black_box(&points), black_box(&origin), Some(10)))
        });
    }

    group.finish();
}

fn bench_address_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("address_resolution");

    group.bench_function("space_separated", |b| {
        b.iter(|| resolve(black_box("서울특별시 강남구 역삼동 123-45")))
    });

    group.bench_function("display_name", |b| {
        b.iter(|| resolve(black_box("역삼1동, 강남구, 서울특별시, 06234, 대한민국")))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_distance,
    bench_radius_filter,
    bench_address_resolution
);
criterion_main!(benches);

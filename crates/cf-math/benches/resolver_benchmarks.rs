//! Resolver Benchmarks
//!
//! Cluster detection and full spin resolution on the standard 6×5 game.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use cf_math::{
    ClusterDetector, GameConfig, Grid, GridSpec, SpinRequest, SymbolSet, SymbolSource,
    TumbleResolver, WeightedDraw,
};

/// Benchmark flood fill on a few fixed shapes
fn bench_cluster_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster_detection");
    let symbols = SymbolSet::standard();
    let detector = ClusterDetector::new(8);

    let full = Grid::filled(GridSpec::standard_6x5(), 1);
    let config = GameConfig::default();
    let mut draw = WeightedDraw::seeded(&config, 42).unwrap();
    let random = draw.draw_grid(config.grid, false, 11);

    for (name, grid) in [("full", &full), ("random", &random)] {
        group.throughput(Throughput::Elements(grid.len() as u64));
        group.bench_with_input(BenchmarkId::new("detect", name), grid, |b, grid| {
            b.iter(|| black_box(detector.detect(grid, &symbols)))
        });
    }

    group.finish();
}

/// Benchmark whole spins, tumbles included
fn bench_spin_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("spin_resolution");
    let resolver = TumbleResolver::new(GameConfig::default()).unwrap();

    for (name, request) in [
        ("base", SpinRequest::base(1.0)),
        ("ante", SpinRequest::base(1.0).with_ante(true)),
        ("free_spin", SpinRequest::free_spin(1.0, 10)),
    ] {
        let mut draw = WeightedDraw::seeded(resolver.config(), 7).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| black_box(resolver.spin(&request, &mut draw).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cluster_detection, bench_spin_resolution);
criterion_main!(benches);

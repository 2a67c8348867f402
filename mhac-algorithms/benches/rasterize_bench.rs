use criterion::{criterion_group, criterion_main, Criterion};
use mhac_algorithms::{
    height_above_ground::{normalize_heights, GroundModel, HagParameters},
    rasterize::rasterize_max,
};
use mhac_core::{
    containers::{Dimension, LidarPoint, PointCloud},
    raster::Grid,
};
use rand::{distributions::Uniform, thread_rng, Rng};

const NUM_POINTS_SMALL: usize = 10_000;
const NUM_POINTS_MEDIUM: usize = 100_000;
const NUM_POINTS_BIG: usize = 1_000_000;

fn random_tile_point<R: Rng + ?Sized>(rng: &mut R) -> LidarPoint {
    LidarPoint::new(
        rng.sample(Uniform::new(333_000.0, 333_500.0)),
        rng.sample(Uniform::new(7_394_000.0, 7_394_400.0)),
        rng.sample(Uniform::new(700.0, 800.0)),
        rng.sample(Uniform::new_inclusive(1u8, 6)),
    )
}

fn get_dummy_tile(num_points: usize) -> PointCloud {
    let mut rng = thread_rng();
    (0..num_points).map(|_| random_tile_point(&mut rng)).collect()
}

fn bench(c: &mut Criterion) {
    let grid = Grid::new(333_000.0, 7_394_000.0, 1.0, 500, 400).unwrap();
    for (testname, num_points) in [
        ("small", NUM_POINTS_SMALL),
        ("medium", NUM_POINTS_MEDIUM),
        ("big", NUM_POINTS_BIG),
    ] {
        let cloud = get_dummy_tile(num_points);
        c.bench_function(&format!("rasterize_max_z_{}", testname), |b| {
            b.iter(|| rasterize_max(&cloud, Dimension::Z, &grid, -9999.0))
        });

        let ground = GroundModel::from_cloud(&cloud).unwrap();
        c.bench_function(&format!("normalize_heights_{}", testname), |b| {
            b.iter(|| normalize_heights(&cloud, &ground, &HagParameters::default()))
        });
    }
}

criterion_group! {
    name = rasterize;
    config = Criterion::default().sample_size(20);
    targets = bench
}
criterion_main!(rasterize);

use std::hint::black_box;
use std::time::Duration;

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use exuber_rs::MonteCarloConfig;
use exuber_rs::RadfConfig;
use exuber_rs::WorkerPool;
use exuber_rs::mc_cv;
use exuber_rs::stats::stationarity::radf::radf_series;
use exuber_rs::stochastic::random_walk::RandomWalk;
use exuber_rs::traits::ProcessExt;

fn bench_sweep(c: &mut Criterion) {
  let mut group = c.benchmark_group("RecursiveSweep");
  group.measurement_time(Duration::from_secs(5));
  group.warm_up_time(Duration::from_millis(500));

  for &n in &[100usize, 400] {
    let y = RandomWalk::psy_null(n).sample_seeded(1).to_vec();

    group.bench_with_input(BenchmarkId::new("rls/refresh_100", n), &n, |b, _| {
      let cfg = RadfConfig::default();
      b.iter(|| black_box(radf_series(&y, &cfg).map(|s| s.gsadf)));
    });

    group.bench_with_input(BenchmarkId::new("rls/no_refresh", n), &n, |b, _| {
      let cfg = RadfConfig {
        refresh_every: 0,
        ..RadfConfig::default()
      };
      b.iter(|| black_box(radf_series(&y, &cfg).map(|s| s.gsadf)));
    });

    group.bench_with_input(BenchmarkId::new("rls/lag_2", n), &n, |b, _| {
      let cfg = RadfConfig {
        lag: 2,
        ..RadfConfig::default()
      };
      b.iter(|| black_box(radf_series(&y, &cfg).map(|s| s.gsadf)));
    });
  }

  group.finish();
}

fn bench_monte_carlo(c: &mut Criterion) {
  let mut group = c.benchmark_group("MonteCarlo");
  group.sample_size(10);
  group.measurement_time(Duration::from_secs(10));

  let cfg = MonteCarloConfig {
    n: 100,
    nrep: 200,
    seed: Some(7),
    ..MonteCarloConfig::default()
  };

  group.bench_function("mc_cv/sequential", |b| {
    let pool = WorkerPool::sequential();
    b.iter(|| black_box(mc_cv(&cfg, &pool).map(|cv| cv.iterations())));
  });

  group.bench_function("mc_cv/parallel", |b| {
    let pool = WorkerPool::parallel(None).unwrap();
    b.iter(|| black_box(mc_cv(&cfg, &pool).map(|cv| cv.iterations())));
  });

  group.finish();
}

criterion_group!(benches, bench_sweep, bench_monte_carlo);
criterion_main!(benches);

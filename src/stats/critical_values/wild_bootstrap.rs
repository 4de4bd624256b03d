//! # Wild bootstrap critical values
//!
//! $$
//! \Delta y^*_t = \hat a + \sum_{j=1}^{p}\hat\phi_j\,\Delta y^*_{t-j} + w_t\,\hat e_t,\qquad
//! w_t \in \{-1, 1\}\ \text{equiprobable}
//! $$
//!
//! Resamples every series under the unit-root null fitted to its own
//! differences, keeping the heteroskedasticity of the residuals. One
//! Rademacher vector per draw is shared by all series.

use ndarray::ArrayView2;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::CriticalValues;
use super::CvMeta;
use super::CvMethod;
use super::QuantileSet;
use super::StatisticDistribution;
use super::progress_bar;
use super::resolve_seed;
use super::warn_on_nan;
use crate::error::ExuberResult;
use crate::error::ensure_positive;
use crate::parallel::WorkerPool;
use crate::parallel::unit_seed;
use crate::stats::stationarity::common::NullModel;
use crate::stats::stationarity::common::difference;
use crate::stats::stationarity::common::fit_null_model;
use crate::stats::stationarity::radf::SeriesStatistics;
use crate::stats::stationarity::radf::default_names;
use crate::stats::stationarity::radf::sweep;
use crate::stats::stationarity::radf::validate_batch;
use crate::stats::stationarity::rls::DEFAULT_REFRESH_INTERVAL;

#[derive(Debug, Clone, Copy)]
pub struct WildBootstrapConfig {
  /// Number of bootstrap draws.
  pub nboot: usize,
  pub lag: usize,
  pub minw: Option<usize>,
  pub seed: Option<u64>,
  pub refresh_every: usize,
  pub show_progress: bool,
}

impl Default for WildBootstrapConfig {
  fn default() -> Self {
    Self {
      nboot: 500,
      lag: 0,
      minw: None,
      seed: None,
      refresh_every: DEFAULT_REFRESH_INTERVAL,
      show_progress: false,
    }
  }
}

/// Series rebuilt from one draw of Rademacher weights.
pub fn resample_path(y: &[f64], dy: &[f64], model: &NullModel, weights: &[f64]) -> Vec<f64> {
  let lag = model.phi.len();
  let mut dy_star = Vec::with_capacity(dy.len());
  dy_star.extend_from_slice(&dy[..lag.min(dy.len())]);

  for t in lag..dy.len() {
    let ar: f64 = model
      .phi
      .iter()
      .enumerate()
      .map(|(j, phi)| phi * dy_star[t - 1 - j])
      .sum();
    dy_star.push(model.intercept + ar + weights[t - lag] * model.residuals[t - lag]);
  }

  let mut y_star = Vec::with_capacity(y.len());
  y_star.push(y[0]);
  for d in dy_star {
    let last = y_star[y_star.len() - 1];
    y_star.push(last + d);
  }
  y_star
}

fn rademacher<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<f64> {
  (0..len)
    .map(|_| if rng.random_bool(0.5) { 1.0 } else { -1.0 })
    .collect()
}

struct Bootstrap {
  minw: usize,
  n: usize,
  names: Vec<String>,
  /// Draw-major: `draws[b][j]` is series `j` under draw `b`.
  draws: Vec<Vec<SeriesStatistics>>,
}

impl Bootstrap {
  fn column(&self, j: usize) -> Vec<&SeriesStatistics> {
    self.draws.iter().map(|d| &d[j]).collect()
  }
}

fn simulate(data: &ArrayView2<f64>, cfg: &WildBootstrapConfig, pool: &WorkerPool) -> ExuberResult<Bootstrap> {
  ensure_positive("nboot", cfg.nboot)?;
  let minw = validate_batch(data, cfg.lag, cfg.minw)?;
  let (n, n_series) = data.dim();

  let series: Vec<Vec<f64>> = data.columns().into_iter().map(|c| c.to_vec()).collect();
  let diffs: Vec<Vec<f64>> = series.iter().map(|y| difference(y)).collect();
  let models = series
    .iter()
    .map(|y| fit_null_model(y, cfg.lag))
    .collect::<ExuberResult<Vec<_>>>()?;

  let seed = resolve_seed(cfg.seed);
  let pb = progress_bar(cfg.nboot, cfg.show_progress);
  if let Some(pb) = &pb {
    pb.set_message("Wild Bootstrap");
  }

  tracing::info!(
    nboot = cfg.nboot,
    n,
    n_series,
    minw,
    lag = cfg.lag,
    seed,
    workers = pool.workers(),
    "simulating wild bootstrap critical values"
  );

  let draws = pool.run(cfg.nboot, |b| {
    let mut rng = StdRng::seed_from_u64(unit_seed(seed, b));
    let weights = rademacher(&mut rng, n - 1 - cfg.lag);
    let stats = (0..n_series)
      .map(|j| {
        let y_star = resample_path(&series[j], &diffs[j], &models[j], &weights);
        sweep(&y_star, cfg.lag, minw, cfg.refresh_every)
      })
      .collect::<Vec<_>>();
    if let Some(pb) = &pb {
      pb.inc(1);
    }
    Ok(stats)
  })?;

  if let Some(pb) = pb {
    pb.finish_and_clear();
  }
  tracing::info!(nboot = draws.len(), "wild bootstrap finished");

  Ok(Bootstrap {
    minw,
    n,
    names: default_names(n_series),
    draws,
  })
}

/// Per-series wild bootstrap critical values for the columns of `data`.
pub fn wb_cv(data: ArrayView2<f64>, cfg: &WildBootstrapConfig, pool: &WorkerPool) -> ExuberResult<CriticalValues> {
  let boot = simulate(&data, cfg, pool)?;
  let len = boot.n - boot.minw - cfg.lag;

  let sets = (0..boot.names.len())
    .map(|j| {
      let column = boot.column(j);
      warn_on_nan(&column, "Wild Bootstrap");
      QuantileSet::from_replications(&column, len)
    })
    .collect();

  Ok(CriticalValues::new(
    CvMeta {
      method: CvMethod::WildBootstrap,
      iterations: cfg.nboot,
      minw: boot.minw,
      lag: cfg.lag,
      n: boot.n,
      series_names: boot.names,
    },
    sets,
  ))
}

/// Bootstrap draws of the scalar statistics, one distribution per series.
pub fn wb_distr(
  data: ArrayView2<f64>,
  cfg: &WildBootstrapConfig,
  pool: &WorkerPool,
) -> ExuberResult<Vec<StatisticDistribution>> {
  let boot = simulate(&data, cfg, pool)?;
  Ok(
    (0..boot.names.len())
      .map(|j| StatisticDistribution::from_replications(&boot.column(j)))
      .collect(),
  )
}

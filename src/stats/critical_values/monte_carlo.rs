//! # Monte Carlo critical values
//!
//! $$
//! y_t = y_{t-1} + n^{-1} + \varepsilon_t,\qquad \varepsilon_t\sim\mathcal N(0,1),\quad y_0=0
//! $$
//!
//! Every replication simulates the null DGP above and runs the full
//! recursive sweep. Replication `i` is seeded from `(seed, i)` only.

use super::CriticalValues;
use super::CvMeta;
use super::CvMethod;
use super::QuantileSet;
use super::StatisticDistribution;
use super::progress_bar;
use super::resolve_seed;
use super::warn_on_nan;
use crate::error::ExuberError;
use crate::error::ExuberResult;
use crate::error::ensure_positive;
use crate::parallel::WorkerPool;
use crate::parallel::unit_seed;
use crate::stats::stationarity::radf::RadfConfig;
use crate::stats::stationarity::radf::SeriesStatistics;
use crate::stats::stationarity::radf::sweep;
use crate::stats::stationarity::rls::DEFAULT_REFRESH_INTERVAL;
use crate::stochastic::random_walk::RandomWalk;
use crate::traits::ProcessExt;

#[derive(Debug, Clone, Copy)]
pub struct MonteCarloConfig {
  /// Length of every simulated path.
  pub n: usize,
  /// Number of replications.
  pub nrep: usize,
  pub lag: usize,
  /// Minimum window; `None` uses `psy_minw(n)`.
  pub minw: Option<usize>,
  /// Base seed; `None` draws one from the thread RNG.
  pub seed: Option<u64>,
  pub refresh_every: usize,
  pub show_progress: bool,
}

impl Default for MonteCarloConfig {
  fn default() -> Self {
    Self {
      n: 100,
      nrep: 500,
      lag: 0,
      minw: None,
      seed: None,
      refresh_every: DEFAULT_REFRESH_INTERVAL,
      show_progress: false,
    }
  }
}

impl MonteCarloConfig {
  fn radf_config(&self) -> RadfConfig {
    RadfConfig {
      lag: self.lag,
      minw: self.minw,
      refresh_every: self.refresh_every,
    }
  }

  /// Validates the configuration and returns the resolved minimum window.
  pub fn validate(&self) -> ExuberResult<usize> {
    ensure_positive("n", self.n)?;
    ensure_positive("nrep", self.nrep)?;
    let minw = self.radf_config().resolve_minw(self.n)?;
    let required = minw + self.lag + 2;
    if self.n < required {
      return Err(ExuberError::InsufficientObservations {
        series: "simulated".to_string(),
        got: self.n,
        required,
        minw,
        lag: self.lag,
      });
    }
    Ok(minw)
  }
}

fn simulate(cfg: &MonteCarloConfig, minw: usize, pool: &WorkerPool) -> ExuberResult<Vec<SeriesStatistics>> {
  let seed = resolve_seed(cfg.seed);
  let dgp = RandomWalk::psy_null(cfg.n);
  let pb = progress_bar(cfg.nrep, cfg.show_progress);
  if let Some(pb) = &pb {
    pb.set_message("Monte Carlo");
  }

  tracing::info!(
    n = cfg.n,
    nrep = cfg.nrep,
    minw,
    lag = cfg.lag,
    seed,
    workers = pool.workers(),
    "simulating Monte Carlo critical values"
  );

  let reps = pool.run(cfg.nrep, |i| {
    let y = dgp.sample_seeded(unit_seed(seed, i)).to_vec();
    let stats = sweep(&y, cfg.lag, minw, cfg.refresh_every);
    if let Some(pb) = &pb {
      pb.inc(1);
    }
    Ok(stats)
  })?;

  if let Some(pb) = pb {
    pb.finish_and_clear();
  }
  tracing::info!(nrep = reps.len(), "Monte Carlo simulation finished");
  Ok(reps)
}

/// Monte Carlo critical values of ADF, SADF, GSADF and the BADF/BSADF surfaces.
pub fn mc_cv(cfg: &MonteCarloConfig, pool: &WorkerPool) -> ExuberResult<CriticalValues> {
  let minw = cfg.validate()?;
  let reps = simulate(cfg, minw, pool)?;
  let refs: Vec<&SeriesStatistics> = reps.iter().collect();
  warn_on_nan(&refs, "Monte Carlo");

  let len = cfg.n - minw - cfg.lag;
  let set = QuantileSet::from_replications(&refs, len);
  Ok(CriticalValues::new(
    CvMeta {
      method: CvMethod::MonteCarlo,
      iterations: cfg.nrep,
      minw,
      lag: cfg.lag,
      n: cfg.n,
      series_names: Vec::new(),
    },
    vec![set],
  ))
}

/// Simulated draws of the ADF, SADF and GSADF statistics under the null.
pub fn mc_distr(cfg: &MonteCarloConfig, pool: &WorkerPool) -> ExuberResult<StatisticDistribution> {
  let minw = cfg.validate()?;
  let reps = simulate(cfg, minw, pool)?;
  let refs: Vec<&SeriesStatistics> = reps.iter().collect();
  warn_on_nan(&refs, "Monte Carlo");
  Ok(StatisticDistribution::from_replications(&refs))
}

//! # Critical values
//!
//! $$
//! \hat q_p = x_{(\lfloor h\rfloor)} + (h-\lfloor h\rfloor)\,(x_{(\lfloor h\rfloor+1)}-x_{(\lfloor h\rfloor)}),\qquad h=(m-1)p+1
//! $$
//!
//! Empirical right-tail quantiles of the recursive statistics, either pooled
//! across series (Monte Carlo) or one set per series (wild bootstrap).

pub mod monte_carlo;
pub mod wild_bootstrap;

use std::fmt;

use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use ndarray::Array1;
use ndarray::Array2;

use crate::error::ExuberError;
use crate::error::ExuberResult;
use crate::stats::stationarity::radf::RadfResult;
use crate::stats::stationarity::radf::SeriesStatistics;
use crate::traits::Named;
use crate::traits::Windowed;

/// Confidence levels of the tabulated quantiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SignificanceLevel {
  P90,
  P95,
  P99,
}

pub const SIGNIFICANCE_LEVELS: [SignificanceLevel; 3] = [
  SignificanceLevel::P90,
  SignificanceLevel::P95,
  SignificanceLevel::P99,
];

impl SignificanceLevel {
  pub fn prob(self) -> f64 {
    match self {
      SignificanceLevel::P90 => 0.90,
      SignificanceLevel::P95 => 0.95,
      SignificanceLevel::P99 => 0.99,
    }
  }

  /// Column of this level in a quantile triple or surface.
  pub fn column(self) -> usize {
    self as usize
  }

  pub fn label(self) -> &'static str {
    match self {
      SignificanceLevel::P90 => "90%",
      SignificanceLevel::P95 => "95%",
      SignificanceLevel::P99 => "99%",
    }
  }
}

impl fmt::Display for SignificanceLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// How the critical values were simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvMethod {
  MonteCarlo,
  WildBootstrap,
}

impl CvMethod {
  pub fn label(self) -> &'static str {
    match self {
      CvMethod::MonteCarlo => "Monte Carlo",
      CvMethod::WildBootstrap => "Wild Bootstrap",
    }
  }
}

impl fmt::Display for CvMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// 90/95/99% quantiles of every statistic.
///
/// Scalars are `[q90, q95, q99]`; surfaces are `(end points x 3)`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileSet {
  pub adf: [f64; 3],
  pub sadf: [f64; 3],
  pub gsadf: [f64; 3],
  pub badf: Array2<f64>,
  pub bsadf: Array2<f64>,
}

impl QuantileSet {
  pub(crate) fn from_replications(reps: &[&SeriesStatistics], len: usize) -> Self {
    let surface = |pick: fn(&SeriesStatistics) -> &[f64]| {
      let mut out = Array2::<f64>::zeros((len, 3));
      let mut column = Vec::with_capacity(reps.len());
      for pos in 0..len {
        column.clear();
        column.extend(reps.iter().map(|r| pick(r)[pos]));
        let q = empirical_quantiles(&mut column);
        out.row_mut(pos).assign(&Array1::from(q.to_vec()));
      }
      out
    };

    Self {
      adf: quantiles_of(reps.iter().map(|r| r.adf)),
      sadf: quantiles_of(reps.iter().map(|r| r.sadf)),
      gsadf: quantiles_of(reps.iter().map(|r| r.gsadf)),
      badf: surface(|r| r.badf.as_slice()),
      bsadf: surface(|r| r.bsadf.as_slice()),
    }
  }
}

/// Metadata of a critical-value set.
#[derive(Debug, Clone, PartialEq)]
pub struct CvMeta {
  pub method: CvMethod,
  /// Monte Carlo replications or bootstrap draws.
  pub iterations: usize,
  pub minw: usize,
  pub lag: usize,
  pub n: usize,
  /// Empty for Monte Carlo values, one entry per series for the bootstrap.
  pub series_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CriticalValues {
  meta: CvMeta,
  sets: Vec<QuantileSet>,
}

impl CriticalValues {
  pub(crate) fn new(meta: CvMeta, sets: Vec<QuantileSet>) -> Self {
    debug_assert!(match meta.method {
      CvMethod::MonteCarlo => sets.len() == 1,
      CvMethod::WildBootstrap => sets.len() == meta.series_names.len(),
    });
    Self { meta, sets }
  }

  pub fn meta(&self) -> &CvMeta {
    &self.meta
  }

  pub fn method(&self) -> CvMethod {
    self.meta.method
  }

  pub fn iterations(&self) -> usize {
    self.meta.iterations
  }

  /// Quantiles that apply to series `j`.
  pub fn quantiles_for(&self, j: usize) -> Option<&QuantileSet> {
    match self.meta.method {
      CvMethod::MonteCarlo => self.sets.first(),
      CvMethod::WildBootstrap => self.sets.get(j),
    }
  }

  pub fn sets(&self) -> &[QuantileSet] {
    &self.sets
  }
}

impl Windowed for CriticalValues {
  fn minw(&self) -> usize {
    self.meta.minw
  }

  fn lag(&self) -> usize {
    self.meta.lag
  }

  fn nobs(&self) -> usize {
    self.meta.n
  }
}

impl Named for CriticalValues {
  fn series_names(&self) -> &[String] {
    &self.meta.series_names
  }
}

/// Checks that `cv` can be used to judge `radf`.
pub fn ensure_compatible(radf: &RadfResult, cv: &CriticalValues) -> ExuberResult<()> {
  if radf.minw() != cv.minw() {
    return Err(ExuberError::MinWindowMismatch {
      radf: radf.minw(),
      cv: cv.minw(),
    });
  }
  if radf.surface_len() != cv.surface_len() {
    return Err(ExuberError::LengthMismatch {
      radf: radf.surface_len(),
      cv: cv.surface_len(),
    });
  }
  if cv.method() == CvMethod::WildBootstrap && radf.n_series() != cv.sets.len() {
    return Err(ExuberError::SeriesCountMismatch {
      radf: radf.n_series(),
      cv: cv.sets.len(),
    });
  }
  Ok(())
}

/// Raw simulated draws of the scalar statistics for one series.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticDistribution {
  pub adf: Array1<f64>,
  pub sadf: Array1<f64>,
  pub gsadf: Array1<f64>,
}

impl StatisticDistribution {
  pub(crate) fn from_replications(reps: &[&SeriesStatistics]) -> Self {
    Self {
      adf: reps.iter().map(|r| r.adf).collect(),
      sadf: reps.iter().map(|r| r.sadf).collect(),
      gsadf: reps.iter().map(|r| r.gsadf).collect(),
    }
  }

  /// Share of finite GSADF draws at or above `stat`.
  pub fn gsadf_p_value(&self, stat: f64) -> f64 {
    right_tail_p_value(&self.gsadf, stat)
  }

  pub fn sadf_p_value(&self, stat: f64) -> f64 {
    right_tail_p_value(&self.sadf, stat)
  }
}

fn right_tail_p_value(draws: &Array1<f64>, stat: f64) -> f64 {
  let finite = draws.iter().filter(|d| d.is_finite());
  let (total, above) = finite.fold((0usize, 0usize), |(t, a), d| (t + 1, a + usize::from(*d >= stat)));
  if total == 0 || stat.is_nan() {
    return f64::NAN;
  }
  above as f64 / total as f64
}

/// Hyndman-Fan type 7 (linear interpolation) quantile of an ascending slice.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
  match sorted.len() {
    0 => f64::NAN,
    1 => sorted[0],
    m => {
      let h = (m - 1) as f64 * p;
      let lo = h.floor() as usize;
      let hi = (lo + 1).min(m - 1);
      sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
    }
  }
}

/// 90/95/99% quantiles of the finite entries of `values` (reordered in place).
pub fn empirical_quantiles(values: &mut Vec<f64>) -> [f64; 3] {
  values.retain(|v| v.is_finite());
  values.sort_unstable_by(f64::total_cmp);
  SIGNIFICANCE_LEVELS.map(|lvl| quantile_sorted(&values[..], lvl.prob()))
}

fn quantiles_of(values: impl Iterator<Item = f64>) -> [f64; 3] {
  let mut v: Vec<f64> = values.collect();
  empirical_quantiles(&mut v)
}

pub(crate) fn progress_bar(total: usize, show: bool) -> Option<ProgressBar> {
  if !show {
    return None;
  }
  let pb = ProgressBar::new(total as u64);
  if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} ({eta})") {
    pb.set_style(style.progress_chars("=> "));
  }
  Some(pb)
}

pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
  seed.unwrap_or_else(rand::random)
}

pub(crate) fn warn_on_nan(reps: &[&SeriesStatistics], what: &'static str) {
  let failed = reps.iter().filter(|r| r.gsadf.is_nan()).count();
  if failed > 0 {
    tracing::warn!(failed, total = reps.len(), what, "replications with undefined GSADF were dropped");
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::SignificanceLevel;
  use super::StatisticDistribution;
  use super::empirical_quantiles;
  use super::quantile_sorted;

  #[test]
  fn type7_quantiles_interpolate_linearly() {
    let sorted: Vec<f64> = (1..=11).map(f64::from).collect();
    assert_relative_eq!(quantile_sorted(&sorted, 0.9), 10.0);
    assert_relative_eq!(quantile_sorted(&sorted, 0.95), 10.5);
    assert_relative_eq!(quantile_sorted(&sorted, 0.99), 10.9);
    assert_relative_eq!(quantile_sorted(&[3.0], 0.5), 3.0);
    assert!(quantile_sorted(&[], 0.5).is_nan());
  }

  #[test]
  fn non_finite_draws_are_dropped() {
    let mut v = vec![f64::NAN, 4.0, 1.0, f64::NEG_INFINITY, 2.0, 3.0];
    let q = empirical_quantiles(&mut v);
    assert_eq!(v, vec![1.0, 2.0, 3.0, 4.0]);
    assert!(q[0] <= q[1] && q[1] <= q[2]);
    assert_relative_eq!(q[2], 3.97, epsilon = 1e-12);
  }

  #[test]
  fn levels_map_to_columns_in_order() {
    assert_eq!(SignificanceLevel::P90.column(), 0);
    assert_eq!(SignificanceLevel::P99.column(), 2);
    assert!(SignificanceLevel::P95 < SignificanceLevel::P99);
    assert_eq!(SignificanceLevel::P95.to_string(), "95%");
  }

  #[test]
  fn p_values_count_the_right_tail() {
    let d = StatisticDistribution {
      adf: vec![0.0; 4].into(),
      sadf: vec![0.0; 4].into(),
      gsadf: vec![0.5, 1.0, 1.5, f64::NAN].into(),
    };
    assert_relative_eq!(d.gsadf_p_value(1.0), 2.0 / 3.0);
    assert_relative_eq!(d.gsadf_p_value(9.0), 0.0);
  }
}

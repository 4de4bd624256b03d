//! # Recursive ADF
//!
//! $$
//! \text{BSADF}_{r_2}=\sup_{r_1\in[0,\,r_2-r_w]}\text{ADF}_{r_1}^{r_2},\qquad
//! \text{SADF}=\sup_{r_2}\text{ADF}_{0}^{r_2},\qquad
//! \text{GSADF}=\sup_{r_2}\text{BSADF}_{r_2}
//! $$
//!
//! Every start point runs one expanding recursion of [`RegressionState`], so a
//! sweep costs O(T^2) rank-1 steps rather than one O(T) direct solve per window.

use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::ArrayView2;
use ndarray_stats::QuantileExt;

use super::adf::fit_adf;
use super::common::AdfDesign;
use super::common::psy_minw;
use super::common::validate_series;
use super::common::validate_window;
use super::rls::DEFAULT_REFRESH_INTERVAL;
use super::rls::RegressionState;
use crate::error::ExuberError;
use crate::error::ExuberResult;
use crate::error::ensure_positive;
use crate::index::SeriesIndex;
use crate::parallel::WorkerPool;
use crate::traits::Dated;
use crate::traits::Named;
use crate::traits::Windowed;

/// Configuration of the recursive sweep.
#[derive(Debug, Clone, Copy)]
pub struct RadfConfig {
  /// Lagged differences in every ADF regression.
  pub lag: usize,
  /// Minimum window; `None` uses [`psy_minw`].
  pub minw: Option<usize>,
  /// Rank-1 steps between direct re-fits, `0` disables re-fitting.
  pub refresh_every: usize,
}

impl Default for RadfConfig {
  fn default() -> Self {
    Self {
      lag: 0,
      minw: None,
      refresh_every: DEFAULT_REFRESH_INTERVAL,
    }
  }
}

impl RadfConfig {
  pub fn resolve_minw(&self, n: usize) -> ExuberResult<usize> {
    let minw = self.minw.unwrap_or_else(|| psy_minw(n));
    ensure_positive("minw", minw)?;
    validate_window(minw, self.lag)?;
    Ok(minw)
  }
}

/// Statistics of one series.
#[derive(Debug, Clone)]
pub struct SeriesStatistics {
  pub adf: f64,
  pub sadf: f64,
  pub gsadf: f64,
  pub badf: Vec<f64>,
  pub bsadf: Vec<f64>,
  /// Windows whose regression was numerically singular.
  pub failures: usize,
}

/// Validated single-series sweep.
pub fn radf_series(y: &[f64], cfg: &RadfConfig) -> ExuberResult<SeriesStatistics> {
  let minw = cfg.resolve_minw(y.len())?;
  validate_series("series1", y, minw, cfg.lag)?;
  Ok(sweep(y, cfg.lag, minw, cfg.refresh_every))
}

fn advance(
  state: &mut Option<RegressionState>,
  design: &AdfDesign,
  start: usize,
  end: usize,
  refresh_every: usize,
) -> ExuberResult<f64> {
  let resumed = match state.as_mut() {
    Some(st) if st.end() + 1 == end => Some(st.step(design)),
    _ => None,
  };

  match resumed {
    Some(Ok(())) => {}
    Some(Err(e)) => {
      *state = None;
      return Err(e);
    }
    None => {
      *state = None;
      *state = Some(RegressionState::fit_with_refresh(
        design,
        start,
        end,
        refresh_every,
      )?);
    }
  }

  match state {
    Some(st) => st.t_stat(),
    None => Err(ExuberError::SingularMatrix),
  }
}

fn sup(values: &[f64]) -> f64 {
  *ArrayView1::from(values).max_skipnan()
}

/// Sweep over an already validated series.
pub(crate) fn sweep(y: &[f64], lag: usize, minw: usize, refresh_every: usize) -> SeriesStatistics {
  let design = AdfDesign::new(y, lag);
  let rows = design.rows();
  let len = rows + 1 - minw;

  let mut badf = vec![f64::NAN; len];
  let mut bsadf = vec![f64::NAN; len];
  let mut failures = 0usize;

  for start in 0..len {
    let mut state = None;
    for end in (start + minw - 1)..rows {
      let pos = end + 1 - minw;
      match advance(&mut state, &design, start, end, refresh_every) {
        Ok(t) => {
          if start == 0 {
            badf[pos] = t;
          }
          bsadf[pos] = bsadf[pos].max(t);
        }
        Err(_) => failures += 1,
      }
    }
  }

  let adf = fit_adf(y, lag).map_or(f64::NAN, |fit| fit.statistic);
  if failures > 0 {
    tracing::debug!(failures, windows = len * (len + 1) / 2, "singular ADF windows");
  }

  SeriesStatistics {
    adf,
    sadf: sup(&badf),
    gsadf: sup(&bsadf),
    badf,
    bsadf,
    failures,
  }
}

/// Metadata carried next to the statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct RadfMeta {
  pub minw: usize,
  pub lag: usize,
  pub n: usize,
  pub index: SeriesIndex,
  pub series_names: Vec<String>,
}

/// ADF, SADF and GSADF statistics of a batch of series.
///
/// Surfaces have one row per end point (the trailing `n - minw - lag`
/// observations) and one column per series.
#[derive(Debug, Clone)]
pub struct RadfResult {
  adf: Array1<f64>,
  sadf: Array1<f64>,
  gsadf: Array1<f64>,
  badf: Array2<f64>,
  bsadf: Array2<f64>,
  meta: RadfMeta,
}

impl RadfResult {
  pub fn adf(&self) -> &Array1<f64> {
    &self.adf
  }

  pub fn sadf(&self) -> &Array1<f64> {
    &self.sadf
  }

  pub fn gsadf(&self) -> &Array1<f64> {
    &self.gsadf
  }

  pub fn badf(&self) -> &Array2<f64> {
    &self.badf
  }

  pub fn bsadf(&self) -> &Array2<f64> {
    &self.bsadf
  }

  pub fn meta(&self) -> &RadfMeta {
    &self.meta
  }

  pub fn n_series(&self) -> usize {
    self.meta.series_names.len()
  }

  /// Statistics of series `j`.
  pub fn series(&self, j: usize) -> Option<SeriesView<'_>> {
    (j < self.n_series()).then(|| SeriesView {
      name: &self.meta.series_names[j],
      adf: self.adf[j],
      sadf: self.sadf[j],
      gsadf: self.gsadf[j],
      badf: self.badf.column(j),
      bsadf: self.bsadf.column(j),
    })
  }

  /// Replaces the observation index.
  pub fn with_index(mut self, index: SeriesIndex) -> ExuberResult<Self> {
    if index.len() != self.meta.n {
      return Err(ExuberError::IndexLength {
        got: index.len(),
        expected: self.meta.n,
      });
    }
    self.meta.index = index;
    Ok(self)
  }

  pub fn with_series_names(mut self, names: Vec<String>) -> ExuberResult<Self> {
    if names.len() != self.n_series() {
      return Err(ExuberError::SeriesNames {
        got: names.len(),
        expected: self.n_series(),
      });
    }
    self.meta.series_names = names;
    Ok(self)
  }
}

/// Borrowed statistics of one series of a [`RadfResult`].
#[derive(Debug, Clone, Copy)]
pub struct SeriesView<'a> {
  pub name: &'a str,
  pub adf: f64,
  pub sadf: f64,
  pub gsadf: f64,
  pub badf: ArrayView1<'a, f64>,
  pub bsadf: ArrayView1<'a, f64>,
}

impl Windowed for RadfResult {
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

impl Named for RadfResult {
  fn series_names(&self) -> &[String] {
    &self.meta.series_names
  }
}

impl Dated for RadfResult {
  fn index(&self) -> &SeriesIndex {
    &self.meta.index
  }
}

pub(crate) fn default_names(n_series: usize) -> Vec<String> {
  (1..=n_series).map(|j| format!("series{j}")).collect()
}

/// Validates a batch (observations in rows, series in columns) and resolves `minw`.
pub(crate) fn validate_batch(data: &ArrayView2<f64>, lag: usize, minw: Option<usize>) -> ExuberResult<usize> {
  ensure_positive("data columns", data.ncols())?;
  let cfg = RadfConfig {
    lag,
    minw,
    ..RadfConfig::default()
  };
  let minw = cfg.resolve_minw(data.nrows())?;
  for (j, name) in default_names(data.ncols()).iter().enumerate() {
    let col = data.column(j).to_vec();
    validate_series(name, &col, minw, lag)?;
  }
  Ok(minw)
}

/// Runs the sweep on every column of `data`.
pub fn radf(data: ArrayView2<f64>, cfg: &RadfConfig, pool: &WorkerPool) -> ExuberResult<RadfResult> {
  let minw = validate_batch(&data, cfg.lag, cfg.minw)?;
  let (n, n_series) = data.dim();

  let stats = pool.run(n_series, |j| {
    let y = data.column(j).to_vec();
    Ok(sweep(&y, cfg.lag, minw, cfg.refresh_every))
  })?;

  let len = n - minw - cfg.lag;
  let mut badf = Array2::<f64>::zeros((len, n_series));
  let mut bsadf = Array2::<f64>::zeros((len, n_series));
  for (j, s) in stats.iter().enumerate() {
    badf.column_mut(j).assign(&ArrayView1::from(&s.badf[..]));
    bsadf.column_mut(j).assign(&ArrayView1::from(&s.bsadf[..]));
  }

  Ok(RadfResult {
    adf: stats.iter().map(|s| s.adf).collect(),
    sadf: stats.iter().map(|s| s.sadf).collect(),
    gsadf: stats.iter().map(|s| s.gsadf).collect(),
    badf,
    bsadf,
    meta: RadfMeta {
      minw,
      lag: cfg.lag,
      n,
      index: SeriesIndex::sequential(n),
      series_names: default_names(n_series),
    },
  })
}

/// [`radf`] on a single series with a sequential pool.
pub fn radf_single(y: &[f64], cfg: &RadfConfig) -> ExuberResult<RadfResult> {
  let data = ArrayView2::from_shape((y.len(), 1), y)
    .map_err(|e| ExuberError::invalid("y", "a contiguous series", e))?;
  radf(data, cfg, &WorkerPool::sequential())
}

//! # Report
//!
//! $$
//! \text{reject } H_0 \text{ at level } \alpha \iff \text{stat} > \hat q_{1-\alpha}
//! $$
//!
//! | Module           | Description                                                   |
//! |------------------|---------------------------------------------------------------|
//! | [`summary`]      | Statistics next to their 90/95/99% critical values.           |
//! | [`diagnostics`]  | Per-series significance of the GSADF or SADF statistic.       |
//! | [`datestamp`]    | Origination and termination of explosive episodes.            |
//!
//! Every entry point runs
//! [`ensure_compatible`](crate::stats::critical_values::ensure_compatible)
//! before reading the values.

pub mod datestamp;
pub mod diagnostics;
pub mod summary;

use std::fmt;

use ndarray::Array1;

pub use self::datestamp::DatestampConfig;
pub use self::datestamp::Episode;
pub use self::datestamp::datestamp;
pub use self::diagnostics::Diagnostics;
pub use self::diagnostics::diagnostics;
pub use self::summary::Summary;
pub use self::summary::summary;
use crate::error::ExuberError;
use crate::error::ExuberResult;
use crate::stats::critical_values::SIGNIFICANCE_LEVELS;
use crate::stats::critical_values::SignificanceLevel;
use crate::stats::critical_values::StatisticDistribution;
use crate::stats::stationarity::radf::RadfResult;

/// Highest confidence level at which the unit-root null is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Significance {
  NotRejected,
  P90,
  P95,
  P99,
}

impl Significance {
  /// Ordered comparison of `stat` against `[q90, q95, q99]`; `NaN` never rejects.
  pub fn classify(stat: f64, quantiles: &[f64; 3]) -> Self {
    SIGNIFICANCE_LEVELS
      .iter()
      .rev()
      .find(|lvl| stat > quantiles[lvl.column()])
      .map_or(Significance::NotRejected, |lvl| Significance::from(*lvl))
  }

  pub fn is_rejected(self) -> bool {
    self != Significance::NotRejected
  }

  /// Whether the null is rejected at `level` or a stricter one.
  pub fn rejects_at(self, level: SignificanceLevel) -> bool {
    self >= Significance::from(level)
  }

  pub fn label(self) -> &'static str {
    match self {
      Significance::NotRejected => "not rejected",
      Significance::P90 => "90%",
      Significance::P95 => "95%",
      Significance::P99 => "99%",
    }
  }
}

impl From<SignificanceLevel> for Significance {
  fn from(level: SignificanceLevel) -> Self {
    match level {
      SignificanceLevel::P90 => Significance::P90,
      SignificanceLevel::P95 => Significance::P95,
      SignificanceLevel::P99 => Significance::P99,
    }
  }
}

impl fmt::Display for Significance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// Statistic driving diagnostics and date stamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticOption {
  /// GSADF for the verdict, BSADF for the dates.
  #[default]
  Gsadf,
  /// SADF for the verdict, BADF for the dates.
  Sadf,
}

impl DiagnosticOption {
  pub fn label(self) -> &'static str {
    match self {
      DiagnosticOption::Gsadf => "gsadf",
      DiagnosticOption::Sadf => "sadf",
    }
  }
}

impl fmt::Display for DiagnosticOption {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// Right-tail p-values of the GSADF statistic of every series.
///
/// One distribution is applied to all series (Monte Carlo); otherwise there
/// must be one per series (wild bootstrap).
pub fn p_values(radf: &RadfResult, distr: &[StatisticDistribution]) -> ExuberResult<Array1<f64>> {
  let n_series = radf.n_series();
  if distr.len() != 1 && distr.len() != n_series {
    return Err(ExuberError::SeriesCountMismatch {
      radf: n_series,
      cv: distr.len(),
    });
  }

  Ok(
    radf
      .gsadf()
      .iter()
      .enumerate()
      .map(|(j, stat)| distr[j.min(distr.len() - 1)].gsadf_p_value(*stat))
      .collect(),
  )
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::Significance;
  use super::p_values;
  use crate::error::ExuberError;
  use crate::stats::critical_values::SignificanceLevel;
  use crate::stats::critical_values::StatisticDistribution;
  use crate::stats::stationarity::radf::RadfConfig;
  use crate::stats::stationarity::radf::radf_single;
  use crate::stochastic::random_walk::RandomWalk;
  use crate::traits::ProcessExt;

  #[test]
  fn classification_picks_the_strictest_rejected_level() {
    let q = [1.0, 1.5, 2.0];
    assert_eq!(Significance::classify(0.5, &q), Significance::NotRejected);
    assert_eq!(Significance::classify(1.2, &q), Significance::P90);
    assert_eq!(Significance::classify(1.5, &q), Significance::P90);
    assert_eq!(Significance::classify(1.7, &q), Significance::P95);
    assert_eq!(Significance::classify(3.0, &q), Significance::P99);
    assert_eq!(Significance::classify(f64::NAN, &q), Significance::NotRejected);
  }

  #[test]
  fn rejection_is_ordered_by_level() {
    assert!(Significance::P99.rejects_at(SignificanceLevel::P95));
    assert!(!Significance::P90.rejects_at(SignificanceLevel::P95));
    assert!(!Significance::NotRejected.is_rejected());
    assert_eq!(Significance::P95.to_string(), "95%");
  }

  #[test]
  fn p_values_use_pooled_or_per_series_draws() {
    let y = RandomWalk::psy_null(60).sample_seeded(3).to_vec();
    let radf = radf_single(&y, &RadfConfig::default()).unwrap();
    let stat = radf.gsadf()[0];
    let distr = StatisticDistribution {
      adf: vec![0.0; 4].into(),
      sadf: vec![0.0; 4].into(),
      gsadf: vec![stat - 1.0, stat, stat + 1.0, stat + 2.0].into(),
    };
    let p = p_values(&radf, std::slice::from_ref(&distr)).unwrap();
    assert_relative_eq!(p[0], 0.75);

    let err = p_values(&radf, &[distr.clone(), distr.clone(), distr]).unwrap_err();
    assert_eq!(err, ExuberError::SeriesCountMismatch { radf: 1, cv: 3 });
  }
}

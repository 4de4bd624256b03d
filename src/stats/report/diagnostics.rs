use std::fmt;

use super::DiagnosticOption;
use super::Significance;
use crate::error::ExuberError;
use crate::error::ExuberResult;
use crate::stats::critical_values::CriticalValues;
use crate::stats::critical_values::CvMethod;
use crate::stats::critical_values::ensure_compatible;
use crate::stats::stationarity::radf::RadfResult;
use crate::traits::Named;

/// Verdict of the chosen statistic for every series.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
  pub option: DiagnosticOption,
  pub method: CvMethod,
  pub series_names: Vec<String>,
  pub significance: Vec<Significance>,
}

impl Diagnostics {
  /// Series whose null is rejected at 90% or higher.
  pub fn positive(&self) -> Vec<&str> {
    self
      .series_names
      .iter()
      .zip(&self.significance)
      .filter(|(_, s)| s.is_rejected())
      .map(|(name, _)| name.as_str())
      .collect()
  }

  pub fn significance_of(&self, name: &str) -> Option<Significance> {
    self.position_of(name).map(|j| self.significance[j])
  }
}

impl Named for Diagnostics {
  fn series_names(&self) -> &[String] {
    &self.series_names
  }
}

impl fmt::Display for Diagnostics {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Diagnostics ({}, {} critical values)", self.option, self.method)?;
    for (name, sig) in self.series_names.iter().zip(&self.significance) {
      match sig {
        Significance::NotRejected => writeln!(f, "{name}: cannot reject H0")?,
        lvl => writeln!(f, "{name}: rejects H0 at the {lvl} level")?,
      }
    }
    Ok(())
  }
}

/// Classifies the GSADF (or SADF) statistic of every series.
///
/// SADF has no wild bootstrap distribution, so that pairing is refused.
/// Fails with [`ExuberError::NoRejection`] when no series rejects at 90%.
pub fn diagnostics(radf: &RadfResult, cv: &CriticalValues, option: DiagnosticOption) -> ExuberResult<Diagnostics> {
  ensure_compatible(radf, cv)?;
  if option == DiagnosticOption::Sadf && cv.method() == CvMethod::WildBootstrap {
    return Err(ExuberError::UnsupportedOption {
      option: option.label(),
      method: cv.method().label(),
    });
  }

  let significance = (0..radf.n_series())
    .map(|j| {
      let q = cv.quantiles_for(j).ok_or(ExuberError::SeriesCountMismatch {
        radf: radf.n_series(),
        cv: cv.sets().len(),
      })?;
      Ok(match option {
        DiagnosticOption::Gsadf => Significance::classify(radf.gsadf()[j], &q.gsadf),
        DiagnosticOption::Sadf => Significance::classify(radf.sadf()[j], &q.sadf),
      })
    })
    .collect::<ExuberResult<Vec<_>>>()?;

  if !significance.iter().any(|s| s.is_rejected()) {
    return Err(ExuberError::NoRejection { level: "10%" });
  }

  Ok(Diagnostics {
    option,
    method: cv.method(),
    series_names: radf.series_names().to_vec(),
    significance,
  })
}

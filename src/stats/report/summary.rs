use std::fmt;

use prettytable::Table;
use prettytable::format;
use prettytable::row;

use super::Significance;
use crate::error::ExuberError;
use crate::error::ExuberResult;
use crate::stats::critical_values::CriticalValues;
use crate::stats::critical_values::CvMethod;
use crate::stats::critical_values::ensure_compatible;
use crate::stats::stationarity::radf::RadfResult;
use crate::traits::Named;
use crate::traits::Windowed;

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
  /// `ADF`, `SADF` or `GSADF`.
  pub statistic_name: &'static str,
  pub statistic: f64,
  pub quantiles: [f64; 3],
  pub significance: Significance,
}

impl SummaryRow {
  fn new(statistic_name: &'static str, statistic: f64, quantiles: [f64; 3]) -> Self {
    Self {
      statistic_name,
      statistic,
      quantiles,
      significance: Significance::classify(statistic, &quantiles),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
  pub series: String,
  pub rows: [SummaryRow; 3],
}

impl SeriesSummary {
  pub fn table(&self) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(row!["", "tstat", "90%", "95%", "99%"]);
    for r in &self.rows {
      table.add_row(row![
        r.statistic_name,
        format!("{:.4}", r.statistic),
        format!("{:.4}", r.quantiles[0]),
        format!("{:.4}", r.quantiles[1]),
        format!("{:.4}", r.quantiles[2]),
      ]);
    }
    table
  }
}

/// Test statistics next to their critical values, one block per series.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
  pub method: CvMethod,
  pub iterations: usize,
  pub minw: usize,
  pub lag: usize,
  pub series: Vec<SeriesSummary>,
}

impl Summary {
  pub fn series_summary(&self, name: &str) -> Option<&SeriesSummary> {
    self.series.iter().find(|s| s.series == name)
  }
}

impl fmt::Display for Summary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(
      f,
      "Recursive unit root test ({} critical values, {} iterations, minw = {}, lag = {})",
      self.method, self.iterations, self.minw, self.lag
    )?;
    for s in &self.series {
      writeln!(f)?;
      writeln!(f, "{}", s.series)?;
      write!(f, "{}", s.table())?;
    }
    Ok(())
  }
}

/// Pairs every series of `radf` with the critical values that apply to it.
pub fn summary(radf: &RadfResult, cv: &CriticalValues) -> ExuberResult<Summary> {
  ensure_compatible(radf, cv)?;

  let series = radf
    .series_names()
    .iter()
    .enumerate()
    .map(|(j, name)| {
      let q = cv.quantiles_for(j).ok_or(ExuberError::SeriesCountMismatch {
        radf: radf.n_series(),
        cv: cv.sets().len(),
      })?;
      Ok(SeriesSummary {
        series: name.clone(),
        rows: [
          SummaryRow::new("ADF", radf.adf()[j], q.adf),
          SummaryRow::new("SADF", radf.sadf()[j], q.sadf),
          SummaryRow::new("GSADF", radf.gsadf()[j], q.gsadf),
        ],
      })
    })
    .collect::<ExuberResult<Vec<_>>>()?;

  Ok(Summary {
    method: cv.method(),
    iterations: cv.iterations(),
    minw: radf.minw(),
    lag: radf.lag(),
    series,
  })
}

#[cfg(test)]
mod tests {
  use ndarray::Array2;

  use super::summary;
  use crate::error::ExuberError;
  use crate::parallel::WorkerPool;
  use crate::stats::critical_values::monte_carlo::MonteCarloConfig;
  use crate::stats::critical_values::monte_carlo::mc_cv;
  use crate::stats::stationarity::radf::RadfConfig;
  use crate::stats::stationarity::radf::radf;
  use crate::stochastic::random_walk::RandomWalk;
  use crate::traits::ProcessExt;

  fn mc(n: usize) -> crate::stats::critical_values::CriticalValues {
    let cfg = MonteCarloConfig {
      n,
      nrep: 30,
      seed: Some(5),
      ..MonteCarloConfig::default()
    };
    mc_cv(&cfg, &WorkerPool::sequential()).unwrap()
  }

  #[test]
  fn table_lists_every_statistic() {
    let mut data = Array2::<f64>::zeros((60, 2));
    for j in 0..2 {
      data
        .column_mut(j)
        .assign(&RandomWalk::psy_null(60).sample_seeded(j as u64));
    }
    let res = radf(data.view(), &RadfConfig::default(), &WorkerPool::sequential()).unwrap();
    let s = summary(&res, &mc(60)).unwrap();

    assert_eq!(s.series.len(), 2);
    let first = s.series_summary("series1").unwrap();
    assert_eq!(first.rows[2].statistic_name, "GSADF");
    assert_eq!(first.rows[2].statistic, res.gsadf()[0]);

    let text = s.to_string();
    assert!(text.contains("Monte Carlo"), "{text}");
    assert!(text.contains("series2") && text.contains("GSADF") && text.contains("95%"), "{text}");
  }

  #[test]
  fn mismatched_windows_are_rejected() {
    let y = RandomWalk::psy_null(80).sample_seeded(1);
    let data = y.insert_axis(ndarray::Axis(1));
    let res = radf(data.view(), &RadfConfig::default(), &WorkerPool::sequential()).unwrap();
    let err = summary(&res, &mc(60)).unwrap_err();
    assert_eq!(err, ExuberError::MinWindowMismatch { radf: 16, cv: 14 });
  }
}

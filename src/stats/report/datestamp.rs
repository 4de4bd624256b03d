//! Episodes are runs of consecutive end points where the BSADF (or BADF)
//! sequence exceeds its critical-value surface. Positions are 0-based
//! observation positions of the full series.

use std::fmt;

use prettytable::Table;
use prettytable::format;
use prettytable::row;

use super::DiagnosticOption;
use super::diagnostics;
use crate::error::ExuberError;
use crate::error::ExuberResult;
use crate::index::IndexLabel;
use crate::stats::critical_values::CriticalValues;
use crate::stats::critical_values::SignificanceLevel;
use crate::stats::stationarity::radf::RadfResult;
use crate::traits::Dated;
use crate::traits::Named;
use crate::traits::Windowed;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatestampConfig {
  pub option: DiagnosticOption,
  /// Critical-value surface the statistic must exceed.
  pub sig_level: SignificanceLevel,
  /// Shortest episode kept, in observations.
  pub min_duration: usize,
}

impl Default for DatestampConfig {
  fn default() -> Self {
    Self {
      option: DiagnosticOption::Gsadf,
      sig_level: SignificanceLevel::P95,
      min_duration: 0,
    }
  }
}

/// One explosive episode.
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
  /// First exceeding observation.
  pub start: usize,
  /// First observation back below the critical value, or the last
  /// observation when the episode is ongoing.
  pub end: usize,
  /// Number of exceeding observations.
  pub duration: usize,
  pub ongoing: bool,
  pub start_label: IndexLabel,
  pub end_label: IndexLabel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesEpisodes {
  pub series: String,
  pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Datestamp {
  pub config: DatestampConfig,
  pub series: Vec<SeriesEpisodes>,
}

impl Datestamp {
  pub fn episodes_of(&self, name: &str) -> Option<&[Episode]> {
    self
      .series
      .iter()
      .find(|s| s.series == name)
      .map(|s| s.episodes.as_slice())
  }

  pub fn table(&self) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(row!["Series", "Start", "End", "Duration", "Ongoing"]);
    for s in &self.series {
      for e in &s.episodes {
        table.add_row(row![
          s.series,
          e.start_label.to_string(),
          e.end_label.to_string(),
          e.duration,
          if e.ongoing { "yes" } else { "no" },
        ]);
      }
    }
    table
  }
}

impl fmt::Display for Datestamp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.table())
  }
}

/// `(start, end, ongoing)` of the runs of `true` in `exceeds`.
fn runs(exceeds: &[bool]) -> Vec<(usize, usize, bool)> {
  let mut out = Vec::new();
  let mut open: Option<usize> = None;
  for (p, &x) in exceeds.iter().enumerate() {
    match (open, x) {
      (None, true) => open = Some(p),
      (Some(s), false) => {
        out.push((s, p, false));
        open = None;
      }
      _ => {}
    }
  }
  if let Some(s) = open {
    out.push((s, exceeds.len() - 1, true));
  }
  out
}

/// Dates the explosive episodes of every positive series.
///
/// Series are screened with [`diagnostics`] first. Episodes shorter than
/// `min_duration` are dropped and series left without episodes are omitted;
/// [`ExuberError::NoEpisodes`] is returned when nothing remains.
pub fn datestamp(radf: &RadfResult, cv: &CriticalValues, cfg: &DatestampConfig) -> ExuberResult<Datestamp> {
  let diag = diagnostics(radf, cv, cfg.option)?;
  let offset = radf.minw() + radf.lag();
  let column = cfg.sig_level.column();
  let index = radf.index();

  let mut series = Vec::new();
  for name in diag.positive() {
    let Some(j) = radf.position_of(name) else {
      continue;
    };
    let Some(q) = cv.quantiles_for(j) else {
      continue;
    };

    let (stat, crit) = match cfg.option {
      DiagnosticOption::Gsadf => (radf.bsadf().column(j), q.bsadf.column(column)),
      DiagnosticOption::Sadf => (radf.badf().column(j), q.badf.column(column)),
    };
    let exceeds: Vec<bool> = stat.iter().zip(crit.iter()).map(|(s, c)| s > c).collect();

    let episodes: Vec<Episode> = runs(&exceeds)
      .into_iter()
      .filter_map(|(s, e, ongoing)| {
        let duration = e - s + usize::from(ongoing);
        let (start, end) = (s + offset, e + offset);
        let episode = Episode {
          start,
          end,
          duration,
          ongoing,
          start_label: index.label(start)?,
          end_label: index.label(end)?,
        };
        (duration >= cfg.min_duration).then_some(episode)
      })
      .collect();

    if !episodes.is_empty() {
      series.push(SeriesEpisodes {
        series: name.to_string(),
        episodes,
      });
    }
  }

  if series.is_empty() {
    return Err(ExuberError::NoEpisodes {
      min_duration: cfg.min_duration,
    });
  }
  tracing::debug!(
    series = series.len(),
    episodes = series.iter().map(|s| s.episodes.len()).sum::<usize>(),
    "date stamped explosive episodes"
  );

  Ok(Datestamp { config: *cfg, series })
}

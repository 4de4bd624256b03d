//! # Errors
//!
//! $$
//! \mathcal{E} = \mathcal{E}_{\text{input}} \cup \mathcal{E}_{\text{inconclusive}} \cup \mathcal{E}_{\text{numerical}} \cup \mathcal{E}_{\text{worker}}
//! $$
//!
//! Input-validation errors are raised before any computation starts.
//! Numerical failures are contained inside the recursive sweep, where the
//! affected window is recorded as `NaN`.

use thiserror::Error;

pub type ExuberResult<T> = Result<T, ExuberError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExuberError {
  #[error("argument `{arg}` must be {expected}, got {got}")]
  InvalidArgument {
    arg: &'static str,
    expected: &'static str,
    got: String,
  },

  #[error("series `{series}` has {got} observations, at least {required} are required for minw = {minw} and lag = {lag}")]
  InsufficientObservations {
    series: String,
    got: usize,
    required: usize,
    minw: usize,
    lag: usize,
  },

  #[error("series `{series}` contains a non-finite value at position {position}")]
  NonFinite { series: String, position: usize },

  #[error("minimum window mismatch: radf results use minw = {radf}, critical values use minw = {cv}")]
  MinWindowMismatch { radf: usize, cv: usize },

  #[error("surface length mismatch: radf results have {radf} end points, critical values have {cv}")]
  LengthMismatch { radf: usize, cv: usize },

  #[error("series count mismatch: radf results hold {radf} series, wild bootstrap critical values hold {cv}")]
  SeriesCountMismatch { radf: usize, cv: usize },

  #[error("option `{option}` is not supported with {method} critical values")]
  UnsupportedOption {
    option: &'static str,
    method: &'static str,
  },

  #[error("index length {got} does not match the number of observations {expected}")]
  IndexLength { got: usize, expected: usize },

  #[error("index labels must be strictly increasing, violated at position {position}")]
  UnsortedIndex { position: usize },

  #[error("{got} series names supplied for {expected} series")]
  SeriesNames { got: usize, expected: usize },

  #[error("cannot reject the null hypothesis at the {level} significance level for any series")]
  NoRejection { level: &'static str },

  #[error("no explosive episodes remain after applying min_duration = {min_duration}")]
  NoEpisodes { min_duration: usize },

  #[error("regressor cross-product matrix is singular or ill-conditioned")]
  SingularMatrix,

  #[error("failed to build worker pool: {0}")]
  WorkerPool(String),
}

impl ExuberError {
  pub(crate) fn invalid(arg: &'static str, expected: &'static str, got: impl ToString) -> Self {
    Self::InvalidArgument {
      arg,
      expected,
      got: got.to_string(),
    }
  }

  /// Whether the error belongs to the input-validation class.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      Self::InvalidArgument { .. }
        | Self::InsufficientObservations { .. }
        | Self::NonFinite { .. }
        | Self::MinWindowMismatch { .. }
        | Self::LengthMismatch { .. }
        | Self::SeriesCountMismatch { .. }
        | Self::UnsupportedOption { .. }
        | Self::IndexLength { .. }
        | Self::UnsortedIndex { .. }
        | Self::SeriesNames { .. }
    )
  }
}

/// Fails unless `value` is strictly positive.
pub(crate) fn ensure_positive(arg: &'static str, value: usize) -> ExuberResult<()> {
  if value == 0 {
    return Err(ExuberError::invalid(arg, "a positive integer", value));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::ExuberError;
  use super::ensure_positive;

  #[test]
  fn invalid_argument_names_argument_and_constraint() {
    let err = ensure_positive("nrep", 0).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("`nrep`"), "{msg}");
    assert!(msg.contains("a positive integer"), "{msg}");
    assert!(err.is_validation());
  }

  #[test]
  fn inconclusive_errors_are_not_validation() {
    assert!(!ExuberError::NoEpisodes { min_duration: 5 }.is_validation());
    assert!(!ExuberError::NoRejection { level: "10%" }.is_validation());
    assert!(!ExuberError::SingularMatrix.is_validation());
  }

  #[test]
  fn min_window_mismatch_reports_both_values() {
    let msg = ExuberError::MinWindowMismatch { radf: 19, cv: 25 }.to_string();
    assert!(msg.contains("19") && msg.contains("25"), "{msg}");
  }
}

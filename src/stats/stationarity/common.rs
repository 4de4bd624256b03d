use nalgebra::DMatrix;
use nalgebra::DVector;

use crate::error::ExuberError;
use crate::error::ExuberResult;

/// Determinant floor of the unit-diagonal scaled Gram matrix.
pub const SINGULARITY_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct OlsResult {
  pub beta: Vec<f64>,
  pub std_err: Vec<f64>,
  pub residuals: Vec<f64>,
  pub sse: f64,
  pub sigma2: f64,
  pub nobs: usize,
  pub k: usize,
}

/// Default minimum window `floor((0.01 + 1.8 / sqrt(n)) * n)`.
pub fn psy_minw(n: usize) -> usize {
  let n_f = n as f64;
  ((0.01 + 1.8 / n_f.sqrt()) * n_f).floor() as usize
}

pub fn validate_series(name: &str, y: &[f64], minw: usize, lag: usize) -> ExuberResult<()> {
  if let Some(position) = y.iter().position(|v| !v.is_finite()) {
    return Err(ExuberError::NonFinite {
      series: name.to_string(),
      position,
    });
  }
  let required = minw + lag + 2;
  if y.len() < required {
    return Err(ExuberError::InsufficientObservations {
      series: name.to_string(),
      got: y.len(),
      required,
      minw,
      lag,
    });
  }
  Ok(())
}

/// Checks `minw` against the regressor count of an ADF regression with `lag` lags.
pub fn validate_window(minw: usize, lag: usize) -> ExuberResult<()> {
  if minw < lag + 3 {
    return Err(ExuberError::invalid(
      "minw",
      "an integer of at least lag + 3 so that every window has residual degrees of freedom",
      minw,
    ));
  }
  Ok(())
}

pub fn difference(y: &[f64]) -> Vec<f64> {
  y.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Inverse of a symmetric positive definite cross-product matrix.
///
/// The matrix is scaled to unit diagonal before the Cholesky factorisation so
/// the conditioning check does not depend on the units of the regressors.
pub fn invert_gram(xtx: &DMatrix<f64>) -> ExuberResult<DMatrix<f64>> {
  let k = xtx.nrows();
  let scale: Vec<f64> = xtx.diagonal().iter().map(|d| d.sqrt().recip()).collect();
  if scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
    return Err(ExuberError::SingularMatrix);
  }

  let scaled = DMatrix::from_fn(k, k, |i, j| xtx[(i, j)] * scale[i] * scale[j]);
  let chol = scaled.cholesky().ok_or(ExuberError::SingularMatrix)?;
  let det: f64 = chol.l().diagonal().iter().map(|d| d * d).product();
  if !(det > SINGULARITY_TOLERANCE) {
    return Err(ExuberError::SingularMatrix);
  }

  let inv = chol.inverse();
  Ok(DMatrix::from_fn(k, k, |i, j| inv[(i, j)] * scale[i] * scale[j]))
}

pub fn ols(y: &[f64], x: &DMatrix<f64>) -> ExuberResult<OlsResult> {
  let n = y.len();
  let k = x.ncols();
  if n != x.nrows() || k == 0 || n <= k {
    return Err(ExuberError::invalid(
      "x",
      "a design matrix with more rows than columns matching the response",
      format!("{}x{} for {n} responses", x.nrows(), k),
    ));
  }

  let y_vec = DVector::from_column_slice(y);
  let xtx = x.transpose() * x;
  let xtx_inv = invert_gram(&xtx)?;

  let beta = &xtx_inv * (x.transpose() * &y_vec);
  let residuals_vec = y_vec - x * &beta;

  let residuals: Vec<f64> = residuals_vec.iter().copied().collect();
  let sse = residuals.iter().map(|u| u * u).sum::<f64>();
  let sigma2 = (sse / (n - k) as f64).max(0.0);

  let std_err = (0..k)
    .map(|i| (xtx_inv[(i, i)] * sigma2).max(0.0).sqrt())
    .collect();

  Ok(OlsResult {
    beta: beta.iter().copied().collect(),
    std_err,
    residuals,
    sse,
    sigma2,
    nobs: n,
    k,
  })
}

/// Design of the ADF regression
/// `dy_t = a + rho * y_{t-1} + sum_j phi_j * dy_{t-j} + e_t`.
///
/// Row `r` has response `dy[r + lag]` and regressors
/// `[1, y[r + lag], dy[r + lag - 1], .., dy[r]]`, so it is dated at
/// observation `r + lag + 1`.
#[derive(Debug, Clone)]
pub struct AdfDesign {
  pub lag: usize,
  pub response: Vec<f64>,
  pub regressors: DMatrix<f64>,
}

impl AdfDesign {
  /// Column of the lagged level coefficient.
  pub const LEVEL: usize = 1;

  pub fn new(y: &[f64], lag: usize) -> Self {
    let dy = difference(y);
    let rows = dy.len().saturating_sub(lag);
    let k = 2 + lag;

    let response = dy.get(lag..).map(<[f64]>::to_vec).unwrap_or_default();
    let regressors = DMatrix::from_fn(rows, k, |r, c| match c {
      0 => 1.0,
      1 => y[r + lag],
      j => dy[r + lag - (j - 1)],
    });

    Self {
      lag,
      response,
      regressors,
    }
  }

  pub fn rows(&self) -> usize {
    self.response.len()
  }

  pub fn k(&self) -> usize {
    self.regressors.ncols()
  }

  pub fn row(&self, r: usize) -> DVector<f64> {
    self.regressors.row(r).transpose()
  }
}

/// Null model `dy_t = a + sum_j phi_j * dy_{t-j} + e_t` used by the wild bootstrap.
#[derive(Debug, Clone)]
pub struct NullModel {
  pub intercept: f64,
  pub phi: Vec<f64>,
  pub residuals: Vec<f64>,
}

pub fn fit_null_model(y: &[f64], lag: usize) -> ExuberResult<NullModel> {
  let dy = difference(y);
  let rows = dy.len().saturating_sub(lag);
  let x = DMatrix::from_fn(rows, lag + 1, |r, c| match c {
    0 => 1.0,
    j => dy[r + lag - j],
  });
  let fit = ols(&dy[lag..], &x)?;

  Ok(NullModel {
    intercept: fit.beta[0],
    phi: fit.beta[1..].to_vec(),
    residuals: fit.residuals,
  })
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use approx::assert_relative_eq;
  use nalgebra::DMatrix;

  use super::AdfDesign;
  use super::fit_null_model;
  use super::invert_gram;
  use super::ols;
  use super::psy_minw;
  use super::validate_series;
  use super::validate_window;
  use crate::error::ExuberError;

  #[test]
  fn psy_minw_matches_rule_of_thumb() {
    assert_eq!(psy_minw(100), 19);
    assert_eq!(psy_minw(400), 40);
  }

  #[test]
  fn design_rows_follow_lag_layout() {
    let y = [1.0, 2.0, 4.0, 7.0, 11.0, 16.0];
    let d = AdfDesign::new(&y, 2);
    // dy = [1, 2, 3, 4, 5]
    assert_eq!(d.rows(), 3);
    assert_eq!(d.k(), 4);
    assert_eq!(d.response, vec![3.0, 4.0, 5.0]);
    assert_eq!(d.row(0).as_slice(), &[1.0, 4.0, 2.0, 1.0]);
    assert_eq!(d.row(2).as_slice(), &[1.0, 11.0, 4.0, 3.0]);
  }

  #[test]
  fn ols_recovers_exact_linear_relation() {
    let x = DMatrix::from_fn(20, 2, |r, c| if c == 0 { 1.0 } else { r as f64 * 0.5 });
    let y: Vec<f64> = (0..20).map(|r| 3.0 - 2.0 * (r as f64 * 0.5)).collect();
    let fit = ols(&y, &x).unwrap();
    assert_relative_eq!(fit.beta[0], 3.0, epsilon = 1e-10);
    assert_relative_eq!(fit.beta[1], -2.0, epsilon = 1e-10);
    assert_abs_diff_eq!(fit.sse, 0.0, epsilon = 1e-18);
  }

  #[test]
  fn collinear_gram_is_singular() {
    let x = DMatrix::from_fn(10, 2, |_, c| if c == 0 { 1.0 } else { 5.0 });
    let xtx = x.transpose() * &x;
    assert_eq!(invert_gram(&xtx).unwrap_err(), ExuberError::SingularMatrix);
  }

  #[test]
  fn null_model_residuals_have_zero_mean() {
    let y: Vec<f64> = (0..60).map(|t| (t as f64 * 0.37).sin() * 3.0 + t as f64 * 0.1).collect();
    let model = fit_null_model(&y, 1).unwrap();
    assert_eq!(model.phi.len(), 1);
    assert_eq!(model.residuals.len(), 58);
    let mean = model.residuals.iter().sum::<f64>() / model.residuals.len() as f64;
    assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-10);
  }

  #[test]
  fn validation_rejects_short_and_non_finite_series() {
    let short = vec![0.0; 10];
    assert!(matches!(
      validate_series("s", &short, 9, 0),
      Err(ExuberError::InsufficientObservations { required: 11, .. })
    ));
    let mut bad = vec![0.0; 30];
    bad[4] = f64::NAN;
    assert_eq!(
      validate_series("s", &bad, 9, 0).unwrap_err(),
      ExuberError::NonFinite {
        series: "s".into(),
        position: 4
      }
    );
    assert!(validate_window(3, 1).is_err());
    assert!(validate_window(4, 1).is_ok());
  }
}

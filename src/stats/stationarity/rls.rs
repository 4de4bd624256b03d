//! # Recursive Least Squares
//!
//! $$
//! P_{t}=P_{t-1}-\frac{P_{t-1}x_tx_t^\top P_{t-1}}{1+x_t^\top P_{t-1}x_t},\qquad
//! \beta_t=\beta_{t-1}+\frac{P_{t-1}x_t\,(y_t-x_t^\top\beta_{t-1})}{1+x_t^\top P_{t-1}x_t}
//! $$
//!
//! Expanding-window OLS on an [`AdfDesign`]. The Sherman-Morrison step is
//! exact in real arithmetic but accumulates rounding error, so the state is
//! re-derived from a direct solve every `refresh_every` steps.

use nalgebra::DMatrix;
use nalgebra::DVector;

use super::common::AdfDesign;
use super::common::invert_gram;
use crate::error::ExuberError;
use crate::error::ExuberResult;

/// Rank-1 steps between two direct re-fits.
pub const DEFAULT_REFRESH_INTERVAL: usize = 100;

/// Sufficient statistics of OLS over rows `start..=end` of a design.
#[derive(Debug, Clone)]
pub struct RegressionState {
  xtx_inv: DMatrix<f64>,
  beta: DVector<f64>,
  rss: f64,
  start: usize,
  end: usize,
  since_refresh: usize,
  refresh_every: usize,
}

impl RegressionState {
  /// Direct OLS on rows `start..=end`.
  pub fn fit(design: &AdfDesign, start: usize, end: usize) -> ExuberResult<Self> {
    Self::fit_with_refresh(design, start, end, DEFAULT_REFRESH_INTERVAL)
  }

  /// Direct OLS on rows `start..=end`; `refresh_every = 0` never re-fits.
  pub fn fit_with_refresh(
    design: &AdfDesign,
    start: usize,
    end: usize,
    refresh_every: usize,
  ) -> ExuberResult<Self> {
    let k = design.k();
    if start > end || end >= design.rows() {
      return Err(ExuberError::invalid(
        "end",
        "a design row at or after `start`",
        format!("rows {start}..={end} of {}", design.rows()),
      ));
    }
    let nobs = end + 1 - start;
    if nobs <= k {
      return Err(ExuberError::invalid(
        "end",
        "a window with more rows than regressors",
        format!("{nobs} rows for {k} regressors"),
      ));
    }

    let x = design.regressors.rows(start, nobs);
    let y = DVector::from_column_slice(&design.response[start..=end]);

    let xtx_inv = invert_gram(&(x.transpose() * x))?;
    let beta = &xtx_inv * (x.transpose() * &y);
    let resid = y - x * &beta;

    Ok(Self {
      xtx_inv,
      beta,
      rss: resid.norm_squared(),
      start,
      end,
      since_refresh: 0,
      refresh_every,
    })
  }

  /// Appends row `end + 1` of `design` to the window.
  pub fn step(&mut self, design: &AdfDesign) -> ExuberResult<()> {
    let next = self.end + 1;
    if next >= design.rows() || design.k() != self.beta.len() {
      return Err(ExuberError::invalid(
        "design",
        "a design with a row after the current window",
        format!("row {next} of {}", design.rows()),
      ));
    }

    if self.refresh_every > 0 && self.since_refresh + 1 >= self.refresh_every {
      *self = Self::fit_with_refresh(design, self.start, next, self.refresh_every)?;
      return Ok(());
    }

    let x = design.row(next);
    let px = &self.xtx_inv * &x;
    let denom = 1.0 + x.dot(&px);
    if !denom.is_finite() || denom <= 0.0 {
      return Err(ExuberError::SingularMatrix);
    }

    let err = design.response[next] - x.dot(&self.beta);
    self.beta += &px * (err / denom);
    self.xtx_inv -= (&px * px.transpose()) / denom;
    self.rss += err * err / denom;
    self.end = next;
    self.since_refresh += 1;
    Ok(())
  }

  pub fn nobs(&self) -> usize {
    self.end + 1 - self.start
  }

  pub fn start(&self) -> usize {
    self.start
  }

  pub fn end(&self) -> usize {
    self.end
  }

  pub fn coefficients(&self) -> &DVector<f64> {
    &self.beta
  }

  pub fn rss(&self) -> f64 {
    self.rss
  }

  pub fn xtx_inv(&self) -> &DMatrix<f64> {
    &self.xtx_inv
  }

  /// t-ratio of the lagged level coefficient.
  pub fn t_stat(&self) -> ExuberResult<f64> {
    let k = self.beta.len();
    let sigma2 = self.rss / (self.nobs() - k) as f64;
    let var = sigma2 * self.xtx_inv[(AdfDesign::LEVEL, AdfDesign::LEVEL)];
    if !var.is_finite() || var <= 0.0 {
      return Err(ExuberError::SingularMatrix);
    }
    Ok(self.beta[AdfDesign::LEVEL] / var.sqrt())
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use rand::Rng;
  use rand::SeedableRng;
  use rand::rngs::StdRng;
  use rand_distr::StandardNormal;

  use super::RegressionState;
  use crate::error::ExuberError;
  use crate::stats::stationarity::common::AdfDesign;
  use crate::stats::stationarity::common::ols;

  fn random_walk(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut y = vec![0.0; n];
    for t in 1..n {
      y[t] = y[t - 1] + rng.sample::<f64, _>(StandardNormal);
    }
    y
  }

  fn direct_t_stat(design: &AdfDesign, start: usize, end: usize) -> (Vec<f64>, f64) {
    let rows = end + 1 - start;
    let x = design.regressors.rows(start, rows).into_owned();
    let fit = ols(&design.response[start..=end], &x).unwrap();
    let t = fit.beta[AdfDesign::LEVEL] / fit.std_err[AdfDesign::LEVEL];
    (fit.beta, t)
  }

  #[test]
  fn rank_one_steps_match_direct_solve() {
    for lag in [0usize, 2] {
      let y = random_walk(320, 11 + lag as u64);
      let design = AdfDesign::new(&y, lag);
      let minw = 25;
      let mut state = RegressionState::fit(&design, 3, 3 + minw - 1).unwrap();

      while state.end() + 1 < design.rows() {
        state.step(&design).unwrap();
        let (beta, t) = direct_t_stat(&design, 3, state.end());
        for (a, b) in state.coefficients().iter().zip(beta.iter()) {
          assert_relative_eq!(*a, *b, max_relative = 1e-8, epsilon = 1e-10);
        }
        assert_relative_eq!(state.t_stat().unwrap(), t, max_relative = 1e-8);
      }
    }
  }

  #[test]
  fn drift_without_refresh_stays_bounded() {
    let y = random_walk(2000, 5);
    let design = AdfDesign::new(&y, 1);
    let mut state = RegressionState::fit_with_refresh(&design, 0, 19, 0).unwrap();
    while state.end() + 1 < design.rows() {
      state.step(&design).unwrap();
    }
    let (_, t) = direct_t_stat(&design, 0, state.end());
    assert_relative_eq!(state.t_stat().unwrap(), t, max_relative = 1e-6);
  }

  #[test]
  fn refresh_resets_to_direct_fit() {
    let y = random_walk(200, 9);
    let design = AdfDesign::new(&y, 0);
    let mut state = RegressionState::fit_with_refresh(&design, 0, 9, 4).unwrap();
    for _ in 0..4 {
      state.step(&design).unwrap();
    }
    let direct = RegressionState::fit(&design, 0, 13).unwrap();
    assert_eq!(state.end(), 13);
    assert_relative_eq!(state.rss(), direct.rss(), max_relative = 1e-12);
    assert_relative_eq!(
      state.t_stat().unwrap(),
      direct.t_stat().unwrap(),
      max_relative = 1e-12
    );
  }

  #[test]
  fn rss_update_matches_residual_sum() {
    let y = random_walk(150, 21);
    let design = AdfDesign::new(&y, 0);
    let mut state = RegressionState::fit_with_refresh(&design, 10, 40, 0).unwrap();
    for _ in 0..60 {
      state.step(&design).unwrap();
    }
    let direct = RegressionState::fit(&design, 10, 100).unwrap();
    assert_relative_eq!(state.rss(), direct.rss(), max_relative = 1e-9);
  }

  #[test]
  fn out_of_range_windows_are_rejected() {
    let y = random_walk(50, 3);
    let design = AdfDesign::new(&y, 0);
    assert_eq!(design.rows(), 49);
    assert!(RegressionState::fit(&design, 10, 5).unwrap_err().is_validation());
    assert!(RegressionState::fit(&design, 10, 60).unwrap_err().is_validation());
    assert!(RegressionState::fit(&design, 4, 5).unwrap_err().is_validation());

    let mut state = RegressionState::fit(&design, 30, 48).unwrap();
    let err = state.step(&design).unwrap_err();
    assert!(err.is_validation(), "{err}");
    assert_eq!(state.end(), 48);

    let lagged = AdfDesign::new(&y, 2);
    let mut state = RegressionState::fit(&design, 0, 20).unwrap();
    assert!(state.step(&lagged).unwrap_err().is_validation());
  }

  #[test]
  fn constant_series_signals_numerical_failure() {
    let y = vec![4.2; 50];
    let design = AdfDesign::new(&y, 0);
    let err = RegressionState::fit(&design, 0, 20).unwrap_err();
    assert_eq!(err, ExuberError::SingularMatrix);
  }
}

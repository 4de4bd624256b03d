use super::common::AdfDesign;
use super::common::ols;
use crate::error::ExuberError;
use crate::error::ExuberResult;

/// Full-sample Augmented Dickey-Fuller regression with a constant.
#[derive(Debug, Clone)]
pub struct AdfFit {
  /// Number of lagged differences.
  pub lag: usize,
  /// t-ratio of the lagged level coefficient.
  pub statistic: f64,
  /// Lagged level coefficient.
  pub gamma: f64,
  /// Standard error of `gamma`.
  pub std_err_gamma: f64,
  /// Number of regression observations.
  pub nobs: usize,
  /// Residual variance estimate.
  pub sigma2: f64,
}

/// Direct (non-recursive) ADF fit over the whole sample.
pub fn fit_adf(y: &[f64], lag: usize) -> ExuberResult<AdfFit> {
  let design = AdfDesign::new(y, lag);
  if design.rows() <= design.k() {
    return Err(ExuberError::invalid(
      "lag",
      "small enough to leave residual degrees of freedom",
      lag,
    ));
  }
  let fit = ols(&design.response, &design.regressors)?;

  let gamma = fit.beta[AdfDesign::LEVEL];
  let se = fit.std_err[AdfDesign::LEVEL];
  if !(se > 0.0) {
    return Err(ExuberError::SingularMatrix);
  }

  Ok(AdfFit {
    lag,
    statistic: gamma / se,
    gamma,
    std_err_gamma: se,
    nobs: fit.nobs,
    sigma2: fit.sigma2,
  })
}

#[cfg(test)]
mod tests {
  use rand::Rng;
  use rand::SeedableRng;
  use rand::rngs::StdRng;
  use rand_distr::StandardNormal;

  use super::fit_adf;

  fn simulate_ar1(phi: f64, n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut x = vec![1.0; n];
    for t in 1..n {
      x[t] = phi * x[t - 1] + rng.sample::<f64, _>(StandardNormal);
    }
    x
  }

  #[test]
  fn stationary_ar1_gives_large_negative_statistic() {
    let x = simulate_ar1(0.5, 1500, 3);
    let fit = fit_adf(&x, 2).unwrap();
    assert!(fit.statistic < -5.0, "got {fit:?}");
    assert_eq!(fit.nobs, 1500 - 1 - 2);
  }

  #[test]
  fn explosive_ar1_gives_positive_statistic() {
    let x = simulate_ar1(1.03, 150, 8);
    let fit = fit_adf(&x, 0).unwrap();
    assert!(fit.statistic > 0.0, "got {fit:?}");
    assert!(fit.gamma > 0.0);
  }

  #[test]
  fn too_many_lags_is_rejected() {
    let x = simulate_ar1(0.5, 8, 1);
    assert!(fit_adf(&x, 4).unwrap_err().is_validation());
  }
}

//! # Single-bubble process
//!
//! $$
//! y_t=\begin{cases}
//! c\,n^{-\eta}+y_{t-1}+\varepsilon_t & t<t_e\\
//! \delta_n\,y_{t-1}+\varepsilon_t,\ \ \delta_n=1+c_1 n^{-\alpha} & t_e\le t\le t_f\\
//! y_{t_e}+\varepsilon_t & t=t_f+1\\
//! c\,n^{-\eta}+y_{t-1}+\varepsilon_t & t>t_f+1
//! \end{cases}
//! $$
//!
use ndarray::Array1;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::traits::ProcessExt;

/// Drifted random walk with one mildly explosive episode and a collapse.
#[derive(Debug, Clone, Copy)]
pub struct PsyBubble {
  pub n: usize,
  /// Origination of the explosive regime.
  pub te: usize,
  /// Last explosive observation.
  pub tf: usize,
  pub c: f64,
  pub c1: f64,
  pub eta: f64,
  pub alpha: f64,
  pub sigma: f64,
  pub x0: f64,
}

impl PsyBubble {
  /// Bubble over `[0.4 n, 0.55 n]` with the usual PSY calibration.
  pub fn new(n: usize) -> Self {
    let te = (0.4 * n as f64).round() as usize;
    Self {
      n,
      te,
      tf: te + (0.15 * n as f64).round() as usize,
      c: 1.0,
      c1: 1.0,
      eta: 0.6,
      alpha: 0.6,
      sigma: 6.79,
      x0: 100.0,
    }
  }

  pub fn growth(&self) -> f64 {
    1.0 + self.c1 * (self.n as f64).powf(-self.alpha)
  }
}

impl ProcessExt for PsyBubble {
  type Output = Array1<f64>;

  fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Output {
    let mut y = Array1::<f64>::zeros(self.n);
    if self.n == 0 {
      return y;
    }
    y[0] = self.x0;

    let drift = self.c * (self.n as f64).powf(-self.eta);
    let delta = self.growth();
    let origin = self.te.min(self.n - 1);

    for t in 1..self.n {
      let e: f64 = rng.sample(StandardNormal);
      let e = self.sigma * e;
      y[t] = if t >= self.te && t <= self.tf {
        delta * y[t - 1] + e
      } else if t == self.tf + 1 {
        y[origin] + e
      } else {
        drift + y[t - 1] + e
      };
    }

    y
  }
}

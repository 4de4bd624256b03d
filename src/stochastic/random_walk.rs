use ndarray::Array1;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::traits::ProcessExt;

/// Gaussian random walk `y_t = y_{t-1} + drift + sigma * e_t`, `y_0 = x0`.
#[derive(Debug, Clone, Copy)]
pub struct RandomWalk {
  pub n: usize,
  pub drift: f64,
  pub sigma: f64,
  pub x0: f64,
}

impl RandomWalk {
  pub fn new(n: usize, drift: f64, sigma: f64, x0: f64) -> Self {
    Self {
      n,
      drift,
      sigma,
      x0,
    }
  }

  /// Null DGP of the Monte Carlo critical values: unit variance, drift `1/n`.
  pub fn psy_null(n: usize) -> Self {
    Self::new(n, 1.0 / n as f64, 1.0, 0.0)
  }
}

impl ProcessExt for RandomWalk {
  type Output = Array1<f64>;

  fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Output {
    let mut rw = Array1::<f64>::zeros(self.n);
    if self.n == 0 {
      return rw;
    }
    rw[0] = self.x0;

    for i in 1..self.n {
      let e: f64 = rng.sample(StandardNormal);
      rw[i] = rw[i - 1] + self.drift + self.sigma * e;
    }

    rw
  }
}

#[cfg(test)]
mod tests {
  use super::RandomWalk;
  use crate::traits::ProcessExt;

  #[test]
  fn seeded_paths_are_reproducible() {
    let rw = RandomWalk::psy_null(50);
    assert_eq!(rw.sample_seeded(9), rw.sample_seeded(9));
    assert_ne!(rw.sample_seeded(9), rw.sample_seeded(10));
    assert_eq!(rw.sample_seeded(9)[0], 0.0);
  }

  #[test]
  fn sample_par_matches_unit_seeds() {
    let rw = RandomWalk::new(30, 0.0, 2.0, 5.0);
    let pool = crate::parallel::WorkerPool::parallel(Some(2)).unwrap();
    let paths = rw.sample_par(4, 77, &pool).unwrap();
    assert_eq!(paths.len(), 4);
    assert_eq!(paths, rw.sample_par(4, 77, &Default::default()).unwrap());
    for (i, p) in paths.iter().enumerate() {
      assert_eq!(*p, rw.sample_seeded(crate::parallel::unit_seed(77, i)));
    }
  }

  #[test]
  fn zero_volatility_walk_is_linear_drift() {
    let rw = RandomWalk::new(5, 0.5, 0.0, 1.0);
    assert_eq!(rw.sample().to_vec(), vec![1.0, 1.5, 2.0, 2.5, 3.0]);
  }
}

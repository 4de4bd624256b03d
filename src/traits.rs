//! # Traits
//!
//! $$
//! \text{Capabilities: }\mathcal{W}(\text{minw},\text{lag}),\ \mathcal{N}(\text{names}),\ \mathcal{D}(\tau_1,\dots,\tau_n)
//! $$
//!
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use crate::error::ExuberResult;
use crate::index::SeriesIndex;
use crate::parallel::WorkerPool;
use crate::parallel::unit_seed;

/// Objects computed over a recursive window grid.
pub trait Windowed {
  /// Minimum window used by the first regression of every recursion.
  fn minw(&self) -> usize;

  /// Number of lagged differences in the ADF regression.
  fn lag(&self) -> usize;

  /// Number of observations of the underlying series.
  fn nobs(&self) -> usize;

  /// Number of end points covered by the BADF/BSADF surfaces.
  fn surface_len(&self) -> usize {
    self.nobs().saturating_sub(self.minw() + self.lag())
  }
}

/// Objects carrying one entry per named series.
pub trait Named {
  fn series_names(&self) -> &[String];

  fn position_of(&self, name: &str) -> Option<usize> {
    self.series_names().iter().position(|s| s == name)
  }
}

/// Objects aligned to an observation index.
pub trait Dated: Windowed {
  fn index(&self) -> &SeriesIndex;

  /// Index labels of the surface end points.
  fn trimmed_index(&self) -> SeriesIndex {
    self.index().trailing(self.surface_len())
  }
}

/// Seeded path generators.
pub trait ProcessExt: Send + Sync {
  type Output: Send;

  fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Output;

  fn sample(&self) -> Self::Output {
    self.sample_with(&mut rand::rng())
  }

  fn sample_seeded(&self, seed: u64) -> Self::Output {
    self.sample_with(&mut StdRng::seed_from_u64(seed))
  }

  /// `m` independent paths on `pool`, path `i` seeded from `(seed, i)`.
  fn sample_par(&self, m: usize, seed: u64, pool: &WorkerPool) -> ExuberResult<Vec<Self::Output>> {
    pool.run(m, |i| Ok(self.sample_seeded(unit_seed(seed, i))))
  }
}

//! # Parallel
//!
//! $$
//! \{u_0,\dots,u_{m-1}\}\ \xrightarrow{\text{pool}}\ (f(u_0),\dots,f(u_{m-1}))
//! $$
//!
//! Data-parallel fan-out over independent replications or columns. Results
//! keep submission order and unit seeds depend only on `(seed, unit)`, so a
//! sequential pool and a parallel pool produce identical outputs.

use std::num::NonZeroUsize;

use rayon::ThreadPool;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::error::ExuberError;
use crate::error::ExuberResult;

#[inline(always)]
fn splitmix64_next(state: &mut u64) -> u64 {
  *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
  let mut z = *state;
  z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
  z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
  z ^ (z >> 31)
}

/// Seed of work unit `unit` under the global seed `seed`.
pub fn unit_seed(seed: u64, unit: usize) -> u64 {
  let mut state = seed ^ (unit as u64).wrapping_mul(0xd1b5_4a32_d192_ed03);
  splitmix64_next(&mut state)
}

/// All but one available processing unit, at least one.
pub fn default_workers() -> usize {
  std::thread::available_parallelism()
    .map(NonZeroUsize::get)
    .unwrap_or(1)
    .saturating_sub(1)
    .max(1)
}

/// Worker pool owned by the caller and released on drop.
#[derive(Debug)]
pub struct WorkerPool {
  pool: Option<ThreadPool>,
}

impl WorkerPool {
  /// Runs every unit on the calling thread.
  pub fn sequential() -> Self {
    Self { pool: None }
  }

  /// Dedicated thread pool with `workers` threads (default: all but one core).
  pub fn parallel(workers: Option<usize>) -> ExuberResult<Self> {
    let workers = match workers {
      Some(0) => return Err(ExuberError::invalid("workers", "a positive integer", 0)),
      Some(w) => w,
      None => default_workers(),
    };

    let pool = ThreadPoolBuilder::new()
      .num_threads(workers)
      .thread_name(|i| format!("exuber-worker-{i}"))
      .build()
      .map_err(|e| ExuberError::WorkerPool(e.to_string()))?;

    tracing::debug!(workers, "worker pool started");
    Ok(Self { pool: Some(pool) })
  }

  pub fn is_parallel(&self) -> bool {
    self.pool.is_some()
  }

  pub fn workers(&self) -> usize {
    self.pool.as_ref().map_or(1, ThreadPool::current_num_threads)
  }

  /// Executes `f(0), .., f(units - 1)` and returns results in unit order.
  ///
  /// The first error aborts the batch; partial results are discarded.
  pub fn run<T, F>(&self, units: usize, f: F) -> ExuberResult<Vec<T>>
  where
    T: Send,
    F: Fn(usize) -> ExuberResult<T> + Sync + Send,
  {
    match &self.pool {
      None => (0..units).map(f).collect(),
      Some(pool) => pool.install(|| (0..units).into_par_iter().map(&f).collect()),
    }
  }
}

impl Default for WorkerPool {
  fn default() -> Self {
    Self::sequential()
  }
}

//! # Data generating processes
//!
//! | Module            | Description                                                            |
//! |-------------------|------------------------------------------------------------------------|
//! | [`random_walk`]   | Gaussian random walk, the null DGP of the Monte Carlo critical values. |
//! | [`bubble`]        | Phillips-Shi-Yu single-bubble process (explosive episode + collapse).  |
//!
//! Every process implements [`ProcessExt`]: `sample_seeded` is deterministic
//! and `sample_par` seeds path `i` from `(seed, i)` on a caller-owned
//! [`WorkerPool`](crate::parallel::WorkerPool).

pub mod bubble;
pub mod random_walk;

pub use crate::traits::ProcessExt;

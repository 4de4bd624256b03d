//! # exuber-rs
//!
//! $$
//! \text{GSADF}(r_0)=\sup_{r_2\in[r_0,1]}\ \sup_{r_1\in[0,r_2-r_0]}\text{ADF}_{r_1}^{r_2}
//! $$
//!
//! Recursive right-tailed unit-root tests (ADF, SADF, GSADF) of Phillips, Shi
//! and Yu, with Monte Carlo and wild bootstrap critical values and date
//! stamping of explosive episodes.
//!
//! | Module            | Description                                                   |
//! |-------------------|---------------------------------------------------------------|
//! | [`stats`]         | Recursive statistics, critical values and reports.            |
//! | [`stochastic`]    | Null random walk and single-bubble data generating processes. |
//! | [`parallel`]      | Worker pool and per-unit seeding.                             |
//! | [`index`]         | Integer and date observation labels.                          |
//! | [`traits`]        | `Windowed`, `Named`, `Dated` and `ProcessExt`.                |
//! | [`error`]         | `ExuberError` and `ExuberResult`.                             |

pub mod error;
pub mod index;
pub mod parallel;
pub mod stats;
pub mod stochastic;
pub mod traits;

pub use error::ExuberError;
pub use error::ExuberResult;
pub use parallel::WorkerPool;
pub use stats::critical_values::CriticalValues;
pub use stats::critical_values::monte_carlo::MonteCarloConfig;
pub use stats::critical_values::monte_carlo::mc_cv;
pub use stats::critical_values::monte_carlo::mc_distr;
pub use stats::critical_values::wild_bootstrap::WildBootstrapConfig;
pub use stats::critical_values::wild_bootstrap::wb_cv;
pub use stats::critical_values::wild_bootstrap::wb_distr;
pub use stats::stationarity::radf::RadfConfig;
pub use stats::stationarity::radf::RadfResult;
pub use stats::stationarity::radf::radf;

//! # Stats
//!
//! $$
//! \Delta y_t=a+\rho\,y_{t-1}+\sum_{j=1}^{p}\phi_j\,\Delta y_{t-j}+\varepsilon_t
//! $$
//!
//! | Module               | Description                                                    |
//! |----------------------|----------------------------------------------------------------|
//! | [`stationarity`]     | ADF regression, recursive least squares and the PSY sweep.     |
//! | [`critical_values`]  | Monte Carlo and wild bootstrap quantiles of the statistics.    |
//! | [`report`]           | Summary tables, diagnostics and date stamping.                 |

pub mod critical_values;
pub mod report;
pub mod stationarity;

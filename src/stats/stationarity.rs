//! Right-tailed unit-root tests for explosive behaviour.

pub mod adf;
pub mod common;
pub mod radf;
pub mod rls;

//! # Index
//!
//! $$
//! \tau_1 < \tau_2 < \dots < \tau_n
//! $$
//!
//! Sortable observation labels shared by all series of a batch.

use std::fmt;

use chrono::NaiveDate;

use crate::error::ExuberError;
use crate::error::ExuberResult;

/// Single observation label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IndexLabel {
  Integer(i64),
  Date(NaiveDate),
}

impl fmt::Display for IndexLabel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      IndexLabel::Integer(v) => write!(f, "{v}"),
      IndexLabel::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
    }
  }
}

/// Ordered observation labels, either integer or calendar dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesIndex {
  Integer(Vec<i64>),
  Date(Vec<NaiveDate>),
}

impl SeriesIndex {
  /// Default index `1..=n`.
  pub fn sequential(n: usize) -> Self {
    SeriesIndex::Integer((1..=n as i64).collect())
  }

  pub fn integers(labels: Vec<i64>) -> ExuberResult<Self> {
    check_increasing(&labels)?;
    Ok(SeriesIndex::Integer(labels))
  }

  pub fn dates(labels: Vec<NaiveDate>) -> ExuberResult<Self> {
    check_increasing(&labels)?;
    Ok(SeriesIndex::Date(labels))
  }

  pub fn len(&self) -> usize {
    match self {
      SeriesIndex::Integer(v) => v.len(),
      SeriesIndex::Date(v) => v.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn label(&self, position: usize) -> Option<IndexLabel> {
    match self {
      SeriesIndex::Integer(v) => v.get(position).copied().map(IndexLabel::Integer),
      SeriesIndex::Date(v) => v.get(position).copied().map(IndexLabel::Date),
    }
  }

  /// Last `k` labels, the alignment of the BADF/BSADF surfaces.
  pub fn trailing(&self, k: usize) -> SeriesIndex {
    let k = k.min(self.len());
    match self {
      SeriesIndex::Integer(v) => SeriesIndex::Integer(v[v.len() - k..].to_vec()),
      SeriesIndex::Date(v) => SeriesIndex::Date(v[v.len() - k..].to_vec()),
    }
  }
}

fn check_increasing<T: PartialOrd>(labels: &[T]) -> ExuberResult<()> {
  match labels.windows(2).position(|w| w[0] >= w[1]) {
    Some(i) => Err(ExuberError::UnsortedIndex { position: i + 1 }),
    None => Ok(()),
  }
}

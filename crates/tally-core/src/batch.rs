//! Batches of responses and the aggregate statistics derived from them.
//!
//! A batch is rebuilt on every dashboard load and never persisted. Statistics
//! are the only form in which individual responses reach a report document.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::response::{SatisfactionResponse, ServiceQuality};

// ─── Batch ───────────────────────────────────────────────────────────────────

/// An ordered set of responses, newest first.
///
/// The ordering (`recorded_at` descending, then `id` descending) is enforced on
/// construction so every consumer sees the same sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBatch {
  responses: Vec<SatisfactionResponse>,
}

impl ResponseBatch {
  pub fn new(mut responses: Vec<SatisfactionResponse>) -> Self {
    responses.sort_by(|a, b| {
      b.recorded_at
        .cmp(&a.recorded_at)
        .then_with(|| b.id.cmp(&a.id))
    });
    Self { responses }
  }

  pub fn empty() -> Self { Self::default() }

  pub fn is_empty(&self) -> bool { self.responses.is_empty() }

  pub fn len(&self) -> usize { self.responses.len() }

  pub fn iter(&self) -> std::slice::Iter<'_, SatisfactionResponse> { self.responses.iter() }

  pub fn as_slice(&self) -> &[SatisfactionResponse] { &self.responses }
}

impl<'a> IntoIterator for &'a ResponseBatch {
  type Item = &'a SatisfactionResponse;
  type IntoIter = std::slice::Iter<'a, SatisfactionResponse>;

  fn into_iter(self) -> Self::IntoIter { self.iter() }
}

// ─── Statistics ──────────────────────────────────────────────────────────────

/// The span of `recorded_at` values in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  pub start: DateTime<Utc>,
  pub end:   DateTime<Utc>,
}

impl DateRange {
  /// Both ends as calendar dates in the operator's local time zone.
  pub fn local_dates(&self) -> (NaiveDate, NaiveDate) {
    (
      self.start.with_timezone(&Local).date_naive(),
      self.end.with_timezone(&Local).date_naive(),
    )
  }
}

/// How many responses picked a given quality label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityCount {
  pub quality: ServiceQuality,
  pub count:   usize,
}

/// Aggregate figures for a non-empty batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
  pub total:                usize,
  pub distinct_sectors:     usize,
  pub material_missing:     usize,
  /// Sorted by count descending, then by label.
  pub quality_distribution: Vec<QualityCount>,
  pub period:               DateRange,
}

impl BatchStats {
  /// Compute statistics for `batch`. Returns `None` when the batch is empty,
  /// which callers treat as "nothing to show".
  pub fn from_batch(batch: &ResponseBatch) -> Option<Self> {
    let first = batch.responses.first()?;

    let mut sectors = HashSet::new();
    let mut counts: BTreeMap<&ServiceQuality, usize> = BTreeMap::new();
    let mut material_missing = 0;
    let mut start = first.recorded_at;
    let mut end = first.recorded_at;

    for r in batch {
      sectors.insert(r.sector.as_str());
      *counts.entry(&r.service_quality).or_default() += 1;
      if r.material_missing {
        material_missing += 1;
      }
      start = start.min(r.recorded_at);
      end = end.max(r.recorded_at);
    }

    let mut quality_distribution: Vec<QualityCount> = counts
      .into_iter()
      .map(|(quality, count)| QualityCount { quality: quality.clone(), count })
      .collect();
    quality_distribution.sort_by(|a, b| {
      b.count
        .cmp(&a.count)
        .then_with(|| a.quality.as_str().cmp(b.quality.as_str()))
    });

    Some(Self {
      total: batch.len(),
      distinct_sectors: sectors.len(),
      material_missing,
      quality_distribution,
      period: DateRange { start, end },
    })
  }

  /// Share of responses reporting missing material, in percent.
  pub fn material_missing_pct(&self) -> f64 {
    if self.total == 0 {
      return 0.0;
    }
    self.material_missing as f64 / self.total as f64 * 100.0
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

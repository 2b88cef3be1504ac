//! Prompt templates and the text blocks sent as user content.
//!
//! The system instructions live in external files and are treated as opaque
//! configuration. The user content is built here from a batch (sentiment) or
//! from aggregate statistics (executive report).

use std::{fmt::Write as _, path::PathBuf};

use tally_core::{
  batch::{BatchStats, ResponseBatch},
  response::SatisfactionResponse,
};

use crate::{Error, Result};

/// Placeholder used in the report input when no sentiment analysis has run.
pub const NO_SENTIMENT_PLACEHOLDER: &str = "Sentiment analysis not yet performed.";

// ─── Templates ───────────────────────────────────────────────────────────────

/// Where a system instruction comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSource {
  /// Read from disk on every request, so edits apply without a restart.
  File(PathBuf),
  Inline(String),
}

impl PromptSource {
  pub fn load(&self) -> Result<String> {
    match self {
      Self::File(path) => std::fs::read_to_string(path).map_err(|source| Error::Prompt {
        path: path.clone(),
        source,
      }),
      Self::Inline(text) => Ok(text.clone()),
    }
  }
}

/// The two fixed system instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplates {
  pub sentiment: PromptSource,
  pub report:    PromptSource,
}

// ─── Sentiment input ─────────────────────────────────────────────────────────

/// One response as a single line: `Sector: S, Quality: Q[, Comment: C]`.
pub fn flatten_response(r: &SatisfactionResponse) -> String {
  let mut line = format!("Sector: {}, Quality: {}", r.sector, r.service_quality);
  if let Some(comment) = r.comment() {
    let _ = write!(line, ", Comment: {comment}");
  }
  line
}

/// The first `cap` responses of `batch`, flattened, in batch order.
/// Responses past the cap are dropped, not summarised separately.
pub fn sentiment_lines(batch: &ResponseBatch, cap: usize) -> Vec<String> {
  batch.iter().take(cap).map(flatten_response).collect()
}

// ─── Report input ────────────────────────────────────────────────────────────

/// The statistics block the executive report is drafted from.
pub fn statistics_block(stats: &BatchStats, sentiment: Option<&str>) -> String {
  let distribution = stats
    .quality_distribution
    .iter()
    .map(|q| format!("{}: {}", q.quality, q.count))
    .collect::<Vec<_>>()
    .join(", ");
  let (start, end) = stats.period.local_dates();

  let mut out = String::new();
  let _ = writeln!(out, "STATISTICS:");
  let _ = writeln!(out, "- Total responses: {}", stats.total);
  let _ = writeln!(out, "- Sectors evaluated: {}", stats.distinct_sectors);
  let _ = writeln!(
    out,
    "- Material missing: {} cases ({:.1}%)",
    stats.material_missing,
    stats.material_missing_pct()
  );
  let _ = writeln!(out, "- Quality distribution: {distribution}");
  let _ = writeln!(
    out,
    "- Period: {} to {}",
    start.format("%d/%m/%Y"),
    end.format("%d/%m/%Y")
  );
  let _ = writeln!(out);
  let _ = writeln!(out, "SENTIMENT ANALYSIS:");
  out.push_str(sentiment.unwrap_or(NO_SENTIMENT_PLACEHOLDER));
  out
}

// ─── Tests ───────────────────────────────────────────────────────────────────

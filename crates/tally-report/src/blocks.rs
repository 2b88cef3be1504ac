//! Narrative interpretation and the fixed document frame.
//!
//! A narrative is read line by line and mapped to styled [`Block`]s. The
//! preamble and postamble surround those blocks with the title, the report
//! metadata, and the attribution footer.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tally_core::batch::BatchStats;

use crate::style::StyleKind;

const HEADING_GAP: f32 = 12.0;
const BLANK_LINE_GAP: f32 = 6.0;
const SECTION_GAP: f32 = 20.0;
const FOOTER_GAP: f32 = 30.0;

// ─── Blocks ──────────────────────────────────────────────────────────────────

/// A stretch of text in one weight. The paragraph style sets the base face;
/// `bold` forces the bold face for this run.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
  pub text: String,
  pub bold: bool,
}

impl Run {
  pub fn plain(text: impl Into<String>) -> Self { Self { text: text.into(), bold: false } }

  pub fn bold(text: impl Into<String>) -> Self { Self { text: text.into(), bold: true } }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
  Paragraph { style: StyleKind, runs: Vec<Run> },
  /// Vertical gap in points.
  Spacer(f32),
  /// Horizontal line across the frame.
  Rule,
}

impl Block {
  pub fn paragraph(style: StyleKind, text: impl Into<String>) -> Self {
    Self::Paragraph { style, runs: vec![Run::plain(text)] }
  }

  /// A body paragraph of the form `**label** value`.
  pub fn field(label: &str, value: impl std::fmt::Display) -> Self {
    Self::Paragraph {
      style: StyleKind::Body,
      runs:  vec![Run::bold(label), Run::plain(format!(" {value}"))],
    }
  }

  /// The concatenated run text, for paragraphs.
  pub fn text(&self) -> Option<String> {
    match self {
      Self::Paragraph { runs, .. } => Some(runs.iter().map(|r| r.text.as_str()).collect()),
      _ => None,
    }
  }

  pub fn style(&self) -> Option<StyleKind> {
    match self {
      Self::Paragraph { style, .. } => Some(*style),
      _ => None,
    }
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Fixed strings printed around the narrative.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Branding {
  pub title:      String,
  pub subtitle:   String,
  pub author:     String,
  pub technology: String,
}

impl Default for Branding {
  fn default() -> Self {
    Self {
      title:      "Executive Report - Cleaning Service Satisfaction".into(),
      subtitle:   "Satisfaction survey analysis".into(),
      author:     "Facilities Analytics".into(),
      technology: "Rust, SQLite and a hosted language model".into(),
    }
  }
}

/// The figures the preamble needs from a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportStats {
  pub record_count:     usize,
  pub date_range_start: NaiveDate,
  pub date_range_end:   NaiveDate,
}

impl From<&BatchStats> for ReportStats {
  fn from(stats: &BatchStats) -> Self {
    let (date_range_start, date_range_end) = stats.period.local_dates();
    Self { record_count: stats.total, date_range_start, date_range_end }
  }
}

// ─── Line interpretation ─────────────────────────────────────────────────────

/// How a single narrative line is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
  Blank,
  Heading(String),
  Subheading(String),
  Bullet(String),
  Text(String),
  /// Lines starting with `#` that are neither level are dropped.
  Skip,
}

/// Classify one line. Whitespace around the line is ignored.
pub fn classify(raw: &str) -> Line {
  let line = raw.trim();
  if line.is_empty() {
    return Line::Blank;
  }
  if let Some(rest) = heading_body(line, "##") {
    return Line::Heading(rest);
  }
  if let Some(rest) = heading_body(line, "###") {
    return Line::Subheading(rest);
  }
  if line.starts_with('#') {
    return Line::Skip;
  }
  if let Some(rest) = line.strip_prefix("- ") {
    return Line::Bullet(format!("• {rest}"));
  }
  Line::Text(line.replace("**", "").replace('*', ""))
}

/// `marker` alone, or followed by a space, is a heading at that level. The
/// body has every `marker ` and then every `#` removed, and its whitespace
/// collapsed.
fn heading_body(line: &str, marker: &str) -> Option<String> {
  let rest = line.strip_prefix(marker)?;
  if !(rest.is_empty() || rest.starts_with(' ')) {
    return None;
  }
  let body = rest.replace(&format!("{marker} "), "").replace('#', "");
  Some(body.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Map a narrative to the blocks that render it, in order.
pub fn interpret(narrative: &str) -> Vec<Block> {
  let mut blocks = Vec::new();
  for raw in narrative.split('\n') {
    match classify(raw) {
      Line::Blank => blocks.push(Block::Spacer(BLANK_LINE_GAP)),
      Line::Heading(text) => {
        blocks.push(Block::paragraph(StyleKind::Heading, text));
        blocks.push(Block::Spacer(HEADING_GAP));
      }
      Line::Subheading(text) => blocks.push(Block::Paragraph {
        style: StyleKind::Subheading,
        runs:  vec![Run::bold(text)],
      }),
      Line::Bullet(text) => blocks.push(Block::paragraph(StyleKind::Body, text)),
      Line::Text(text) if text.trim().is_empty() => {}
      Line::Text(text) => blocks.push(Block::paragraph(StyleKind::Body, text)),
      Line::Skip => {}
    }
  }
  blocks
}

// ─── Frame ───────────────────────────────────────────────────────────────────

pub fn preamble(branding: &Branding, stats: &ReportStats, generated_at: NaiveDateTime) -> Vec<Block> {
  vec![
    Block::paragraph(StyleKind::Title, &branding.title),
    Block::paragraph(StyleKind::Subtitle, &branding.subtitle),
    Block::Spacer(SECTION_GAP),
    Block::field("Generated on:", generated_at.format("%d/%m/%Y %H:%M")),
    Block::field("Total records analysed:", stats.record_count),
    Block::field(
      "Data period:",
      format!(
        "{} to {}",
        stats.date_range_start.format("%d/%m/%Y"),
        stats.date_range_end.format("%d/%m/%Y")
      ),
    ),
    Block::Spacer(SECTION_GAP),
  ]
}

pub fn postamble(branding: &Branding, generated_at: NaiveDateTime) -> Vec<Block> {
  vec![
    Block::Spacer(FOOTER_GAP),
    Block::Rule,
    Block::field("Developed by:", &branding.author),
    Block::field("Technology:", &branding.technology),
    Block::field("Generated on:", generated_at.format("%d/%m/%Y %H:%M")),
  ]
}

/// Every block of the document: preamble, narrative, postamble.
pub fn document(
  branding: &Branding,
  stats: &ReportStats,
  narrative: &str,
  generated_at: NaiveDateTime,
) -> Vec<Block> {
  let mut blocks = preamble(branding, stats, generated_at);
  blocks.extend(interpret(narrative));
  blocks.extend(postamble(branding, generated_at));
  blocks
}

// ─── Tests ───────────────────────────────────────────────────────────────────

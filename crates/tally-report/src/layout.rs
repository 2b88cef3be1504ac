//! Line breaking and pagination.
//!
//! Coordinates are PDF points with the origin at the bottom-left of the page;
//! text `y` values are baselines.

use crate::{
  RenderError, Result,
  blocks::Block,
  metrics,
  style::{Align, FontFace, ParagraphStyle, Rgb},
};

const SPACE_UNITS: f32 = 278.0;
const RULE_HEIGHT: f32 = 12.0;
const RULE_THICKNESS: f32 = 0.5;

// ─── Geometry ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
  pub width:         f32,
  pub height:        f32,
  pub margin_left:   f32,
  pub margin_right:  f32,
  pub margin_top:    f32,
  pub margin_bottom: f32,
}

impl PageGeometry {
  /// A4 portrait with 0.5 in side margins and 1 in top and bottom margins.
  pub const A4: Self = Self {
    width:         595.28,
    height:        841.89,
    margin_left:   36.0,
    margin_right:  36.0,
    margin_top:    72.0,
    margin_bottom: 72.0,
  };

  pub fn frame_width(&self) -> f32 { self.width - self.margin_left - self.margin_right }

  pub fn frame_top(&self) -> f32 { self.height - self.margin_top }

  pub fn frame_bottom(&self) -> f32 { self.margin_bottom }

  fn validate(&self) -> Result<()> {
    if !(self.frame_width() > 0.0 && self.frame_top() > self.frame_bottom()) {
      return Err(RenderError::InvalidGeometry(format!(
        "{}x{} page with margins {}/{}/{}/{}",
        self.width,
        self.height,
        self.margin_top,
        self.margin_right,
        self.margin_bottom,
        self.margin_left
      )));
    }
    Ok(())
  }
}

impl Default for PageGeometry {
  fn default() -> Self { Self::A4 }
}

// ─── Output ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
  pub x:     f32,
  pub y:     f32,
  pub size:  f32,
  pub font:  FontFace,
  pub color: Rgb,
  pub text:  String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Placed {
  Text(PlacedText),
  Rule { x1: f32, x2: f32, y: f32, thickness: f32 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
  pub items: Vec<Placed>,
}

impl Page {
  /// Text items on the page, top to bottom, left to right.
  pub fn texts(&self) -> impl Iterator<Item = &PlacedText> {
    self.items.iter().filter_map(|item| match item {
      Placed::Text(t) => Some(t),
      Placed::Rule { .. } => None,
    })
  }
}

// ─── Words ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Segment {
  text:  String,
  font:  FontFace,
  width: f32,
}

/// A whitespace-delimited unit, possibly spanning runs of different weight.
#[derive(Debug, Clone, Default)]
struct Word {
  segments: Vec<Segment>,
  width:    f32,
}

impl Word {
  fn push(&mut self, ch: char, font: FontFace, size: f32) -> Result<()> {
    let units = metrics::char_units(font, ch).ok_or(RenderError::UnsupportedCharacter(ch))?;
    let w = f32::from(units) * size / 1000.0;
    match self.segments.last_mut() {
      Some(seg) if seg.font == font => {
        seg.text.push(ch);
        seg.width += w;
      }
      _ => self.segments.push(Segment { text: ch.to_string(), font, width: w }),
    }
    self.width += w;
    Ok(())
  }

  fn is_empty(&self) -> bool { self.segments.is_empty() }
}

fn words(block: &Block, style: &ParagraphStyle) -> Result<Vec<Word>> {
  let Block::Paragraph { runs, .. } = block else {
    return Ok(Vec::new());
  };

  let mut out = Vec::new();
  let mut current = Word::default();
  for run in runs {
    let font = if run.bold { FontFace::Bold } else { style.font };
    for ch in metrics::normalize(&run.text)?.chars() {
      if ch.is_whitespace() {
        if !current.is_empty() {
          out.push(std::mem::take(&mut current));
        }
      } else {
        current.push(ch, font, style.size)?;
      }
    }
  }
  if !current.is_empty() {
    out.push(current);
  }
  Ok(out)
}

/// Split a word wider than `max` into pieces that each fit.
fn split_word(word: Word, max: f32, size: f32) -> Result<Vec<Word>> {
  let mut pieces = Vec::new();
  let mut current = Word::default();
  for seg in word.segments {
    for ch in seg.text.chars() {
      let mut single = Word::default();
      single.push(ch, seg.font, size)?;
      if single.width > max {
        return Err(RenderError::InvalidGeometry(format!("frame of {max}pt cannot hold {ch:?}")));
      }
      if !current.is_empty() && current.width + single.width > max {
        pieces.push(std::mem::take(&mut current));
      }
      current.push(ch, seg.font, size)?;
    }
  }
  if !current.is_empty() {
    pieces.push(current);
  }
  Ok(pieces)
}

/// Greedy line filling. Returns each line's words.
fn break_lines(words: Vec<Word>, max: f32, space: f32, size: f32) -> Result<Vec<Vec<Word>>> {
  let mut lines: Vec<Vec<Word>> = Vec::new();
  let mut line: Vec<Word> = Vec::new();
  let mut width = 0.0;

  for word in words {
    let pieces = if word.width > max { split_word(word, max, size)? } else { vec![word] };
    for piece in pieces {
      let needed = if line.is_empty() { piece.width } else { width + space + piece.width };
      if needed > max && !line.is_empty() {
        lines.push(std::mem::take(&mut line));
        width = piece.width;
      } else {
        width = needed;
      }
      line.push(piece);
    }
  }
  if !line.is_empty() {
    lines.push(line);
  }
  Ok(lines)
}

// ─── Engine ──────────────────────────────────────────────────────────────────

struct Cursor<'g> {
  geometry: &'g PageGeometry,
  pages:    Vec<Page>,
  y:        f32,
}

impl<'g> Cursor<'g> {
  fn new(geometry: &'g PageGeometry) -> Self {
    Self { geometry, pages: vec![Page::default()], y: geometry.frame_top() }
  }

  fn fits(&self, height: f32) -> bool { self.y - height >= self.geometry.frame_bottom() }

  fn page_is_empty(&self) -> bool { self.pages.last().is_none_or(|p| p.items.is_empty()) }

  fn new_page(&mut self) {
    self.pages.push(Page::default());
    self.y = self.geometry.frame_top();
  }

  /// Make room for `height`, starting a new page if needed.
  fn reserve(&mut self, height: f32) {
    if !self.fits(height) && !self.page_is_empty() {
      self.new_page();
    }
  }

  fn place(&mut self, item: Placed) {
    if let Some(page) = self.pages.last_mut() {
      page.items.push(item);
    }
  }
}

/// Lay `blocks` out on pages of `geometry`. At least one page is returned.
pub fn layout(blocks: &[Block], geometry: &PageGeometry) -> Result<Vec<Page>> {
  geometry.validate()?;
  let mut cursor = Cursor::new(geometry);

  for block in blocks {
    match block {
      Block::Paragraph { style: kind, .. } => {
        let style = kind.style();
        style.validate()?;
        paragraph(&mut cursor, block, &style)?;
      }
      Block::Spacer(height) => {
        if cursor.fits(*height) {
          cursor.y -= height;
        } else if !cursor.page_is_empty() {
          cursor.new_page();
        }
      }
      Block::Rule => {
        cursor.reserve(RULE_HEIGHT);
        let y = cursor.y - RULE_HEIGHT / 2.0;
        cursor.place(Placed::Rule {
          x1: geometry.margin_left,
          x2: geometry.margin_left + geometry.frame_width(),
          y,
          thickness: RULE_THICKNESS,
        });
        cursor.y -= RULE_HEIGHT;
      }
    }
  }

  Ok(cursor.pages)
}

fn paragraph(cursor: &mut Cursor<'_>, block: &Block, style: &ParagraphStyle) -> Result<()> {
  let geometry = cursor.geometry;
  let max = geometry.frame_width();
  let space = SPACE_UNITS * style.size / 1000.0;
  let lines = break_lines(words(block, style)?, max, space, style.size)?;
  let count = lines.len();

  for (i, line) in lines.into_iter().enumerate() {
    cursor.reserve(style.leading);
    let baseline = cursor.y - style.size;
    let natural: f32 = line.iter().map(|w| w.width).sum::<f32>()
      + space * line.len().saturating_sub(1) as f32;

    let last = i + 1 == count;
    let (start, gap) = match style.align {
      Align::Left => (geometry.margin_left, space),
      Align::Center => (geometry.margin_left + (max - natural) / 2.0, space),
      Align::Justify if last || line.len() < 2 => (geometry.margin_left, space),
      Align::Justify => {
        let extra = (max - natural) / (line.len() - 1) as f32;
        (geometry.margin_left, space + extra)
      }
    };

    for item in place_line(line, start, baseline, gap, space, style) {
      cursor.place(Placed::Text(item));
    }
    cursor.y -= style.leading;
  }

  cursor.y -= style.space_after;
  Ok(())
}

/// Position each segment of a line. Neighbouring segments in the same face
/// separated by a natural space are merged into one item.
fn place_line(
  line: Vec<Word>,
  start: f32,
  baseline: f32,
  gap: f32,
  space: f32,
  style: &ParagraphStyle,
) -> Vec<PlacedText> {
  let mergeable = (gap - space).abs() < f32::EPSILON;
  let mut items: Vec<PlacedText> = Vec::new();
  let mut x = start;

  for (i, word) in line.into_iter().enumerate() {
    if i > 0 {
      x += gap;
    }
    for (j, seg) in word.segments.into_iter().enumerate() {
      let joins_previous = items.last().is_some_and(|prev| prev.font == seg.font);
      match items.last_mut() {
        Some(prev) if joins_previous && j == 0 && i > 0 && mergeable => {
          prev.text.push(' ');
          prev.text.push_str(&seg.text);
        }
        Some(prev) if joins_previous && j > 0 => prev.text.push_str(&seg.text),
        _ => items.push(PlacedText {
          x,
          y: baseline,
          size: style.size,
          font: seg.font,
          color: style.color,
          text: seg.text,
        }),
      }
      x += seg.width;
    }
  }
  items
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{blocks::Run, style::StyleKind};

  fn body(text: &str) -> Block { Block::paragraph(StyleKind::Body, text) }

  fn all_texts(pages: &[Page]) -> Vec<String> {
    pages.iter().flat_map(|p| p.texts().map(|t| t.text.clone())).collect()
  }

  #[test]
  fn empty_input_yields_one_blank_page() {
    let pages = layout(&[], &PageGeometry::A4).unwrap();
    assert_eq!(pages.len(), 1);
    assert!(pages[0].items.is_empty());
  }

  #[test]
  fn short_left_aligned_line_is_one_item() {
    let pages = layout(&[Block::paragraph(StyleKind::Heading, "Key findings")], &PageGeometry::A4)
      .unwrap();
    let texts: Vec<_> = pages[0].texts().collect();
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].text, "Key findings");
    assert_eq!(texts[0].x, 36.0);
    assert_eq!(texts[0].font, FontFace::Bold);
    assert!((texts[0].y - (841.89 - 72.0 - 14.0)).abs() < 1e-3);
  }

  #[test]
  fn long_paragraph_wraps_within_frame() {
    let text = "cleaning ".repeat(200);
    let pages = layout(&[body(&text)], &PageGeometry::A4).unwrap();
    let max_x = 36.0 + PageGeometry::A4.frame_width() + 0.01;

    let mut baselines: Vec<f32> = Vec::new();
    for t in pages.iter().flat_map(Page::texts) {
      let w = metrics::text_width(t.font, t.size, &t.text).unwrap();
      assert!(t.x + w <= max_x, "overflow at {t:?}");
      if baselines.last() != Some(&t.y) {
        baselines.push(t.y);
      }
    }
    assert!(baselines.len() > 5);

    let words: usize = all_texts(&pages).iter().map(|t| t.split_whitespace().count()).sum();
    assert_eq!(words, 200);
  }

  #[test]
  fn justified_lines_reach_the_right_margin() {
    let text = "word ".repeat(60);
    let pages = layout(&[body(&text)], &PageGeometry::A4).unwrap();
    let first_baseline = pages[0].texts().next().unwrap().y;
    let last_on_first_line = pages[0].texts().filter(|t| t.y == first_baseline).last().unwrap();
    let end = last_on_first_line.x
      + metrics::text_width(FontFace::Regular, 11.0, &last_on_first_line.text).unwrap();
    assert!((end - (36.0 + PageGeometry::A4.frame_width())).abs() < 0.05, "{end}");
  }

  #[test]
  fn overlong_word_is_broken() {
    let text = "x".repeat(400);
    let pages = layout(&[body(&text)], &PageGeometry::A4).unwrap();
    let joined: String = all_texts(&pages).concat();
    assert_eq!(joined, text);
    assert!(pages[0].texts().count() > 1);
  }

  #[test]
  fn content_flows_onto_further_pages() {
    let blocks: Vec<_> = (0..120).map(|i| body(&format!("Line {i}"))).collect();
    let pages = layout(&blocks, &PageGeometry::A4).unwrap();
    assert!(pages.len() >= 3, "{} pages", pages.len());

    for page in &pages {
      for t in page.texts() {
        assert!(t.y >= PageGeometry::A4.frame_bottom());
        assert!(t.y <= PageGeometry::A4.frame_top());
      }
    }
    assert_eq!(all_texts(&pages).len(), 120);
    assert_eq!(all_texts(&pages).last().map(String::as_str), Some("Line 119"));
  }

  #[test]
  fn mixed_weight_field_keeps_both_faces() {
    let block = Block::Paragraph {
      style: StyleKind::Body,
      runs:  vec![Run::bold("Generated on:"), Run::plain(" 07/03/2024 09:05")],
    };
    let pages = layout(&[block], &PageGeometry::A4).unwrap();
    let fonts: Vec<_> = pages[0].texts().map(|t| (t.font, t.text.as_str())).collect();
    assert_eq!(fonts, vec![
      (FontFace::Bold, "Generated on:"),
      (FontFace::Regular, "07/03/2024 09:05"),
    ]);
  }

  #[test]
  fn rule_spans_the_frame() {
    let pages = layout(&[Block::Rule], &PageGeometry::A4).unwrap();
    let Placed::Rule { x1, x2, .. } = pages[0].items[0] else {
      panic!("expected a rule");
    };
    assert_eq!(x1, 36.0);
    assert!((x2 - (595.28 - 36.0)).abs() < 1e-3);
  }

  #[test]
  fn unencodable_symbols_are_typeset_as_stand_ins() {
    let pages = layout(&[body("Great \u{1F44D} ≥ 80%")], &PageGeometry::A4).unwrap();
    assert_eq!(all_texts(&pages), vec!["Great ? >= 80%".to_owned()]);
  }

  #[test]
  fn control_character_fails_layout() {
    let err = layout(&[body("Great \u{1B}[0m")], &PageGeometry::A4).unwrap_err();
    assert!(matches!(err, RenderError::UnsupportedCharacter('\u{1B}')));
  }

  #[test]
  fn spacer_that_does_not_fit_is_dropped_at_the_break() {
    let style = StyleKind::Body.style();
    // Room for one body line plus 10pt.
    let frame = style.leading + style.space_after + 10.0;
    let geometry = PageGeometry { height: 144.0 + frame, ..PageGeometry::A4 };

    let with_spacer = layout(&[body("First"), Block::Spacer(20.0), body("Second")], &geometry)
      .unwrap();
    assert_eq!(with_spacer.len(), 2);
    assert_eq!(all_texts(&with_spacer[..1]), vec!["First".to_owned()]);

    let second = with_spacer[1].texts().next().unwrap();
    assert_eq!(second.text, "Second");
    assert!((second.y - (geometry.frame_top() - style.size)).abs() < 1e-3, "{}", second.y);

    let without_spacer = layout(&[body("First"), body("Second")], &geometry).unwrap();
    assert_eq!(with_spacer[1], without_spacer[1]);
  }

  #[test]
  fn degenerate_geometry_is_rejected() {
    let geometry = PageGeometry { margin_left: 400.0, margin_right: 400.0, ..PageGeometry::A4 };
    assert!(matches!(
      layout(&[body("x")], &geometry),
      Err(RenderError::InvalidGeometry(_))
    ));
  }
}

//! Paragraph styles used by the report.
//!
//! Sizes and spacing are in PDF points. Leading is 1.2 × the font size.

/// One of the two built-in faces the report uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
  Regular,
  Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
  Left,
  Center,
  /// Spread words to the frame width; the last line of a paragraph stays left.
  Justify,
}

/// An RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
  pub const BLACK: Self = Self(0.0, 0.0, 0.0);
  pub const DARK_BLUE: Self = Self(0.0, 0.0, 0.545);
  pub const DARK_GREEN: Self = Self(0.0, 0.392, 0.0);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphStyle {
  pub name:        &'static str,
  pub font:        FontFace,
  pub size:        f32,
  pub leading:     f32,
  pub space_after: f32,
  pub align:       Align,
  pub color:       Rgb,
}

/// The named styles a [`Block::Paragraph`](crate::blocks::Block) can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKind {
  Title,
  Subtitle,
  Heading,
  Subheading,
  Body,
}

impl StyleKind {
  pub fn style(self) -> ParagraphStyle {
    match self {
      Self::Title => ParagraphStyle {
        name:        "Title",
        font:        FontFace::Bold,
        size:        18.0,
        leading:     21.6,
        space_after: 30.0,
        align:       Align::Center,
        color:       Rgb::DARK_BLUE,
      },
      Self::Subtitle => ParagraphStyle {
        name:        "Subtitle",
        font:        FontFace::Bold,
        size:        12.0,
        leading:     14.4,
        space_after: 6.0,
        align:       Align::Center,
        color:       Rgb::BLACK,
      },
      Self::Heading => ParagraphStyle {
        name:        "Heading",
        font:        FontFace::Bold,
        size:        14.0,
        leading:     16.8,
        space_after: 12.0,
        align:       Align::Left,
        color:       Rgb::DARK_GREEN,
      },
      Self::Subheading => ParagraphStyle {
        name:        "Subheading",
        font:        FontFace::Bold,
        size:        12.0,
        leading:     14.4,
        space_after: 8.0,
        align:       Align::Left,
        color:       Rgb::BLACK,
      },
      Self::Body => ParagraphStyle {
        name:        "Body",
        font:        FontFace::Regular,
        size:        11.0,
        leading:     13.2,
        space_after: 6.0,
        align:       Align::Justify,
        color:       Rgb::BLACK,
      },
    }
  }
}

impl ParagraphStyle {
  /// Reject styles the layout engine cannot place.
  pub fn validate(&self) -> crate::Result<()> {
    use crate::RenderError::InvalidStyle;

    if !(self.size.is_finite() && self.size > 0.0) {
      return Err(InvalidStyle { style: self.name, reason: "font size must be positive" });
    }
    if !(self.leading.is_finite() && self.leading > 0.0) {
      return Err(InvalidStyle { style: self.name, reason: "leading must be positive" });
    }
    if !(self.space_after.is_finite() && self.space_after >= 0.0) {
      return Err(InvalidStyle { style: self.name, reason: "space after must not be negative" });
    }
    Ok(())
  }
}

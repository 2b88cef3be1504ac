//! Advance widths for the built-in Helvetica faces over the WinAnsi
//! repertoire, in thousandths of an em, and the mapping of other printable
//! characters onto that repertoire.

use std::borrow::Cow;

use crate::{RenderError, Result, style::FontFace};

#[rustfmt::skip]
const HELVETICA_ASCII: [u16; 95] = [
  278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
  556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
  1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
  667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
  333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
  556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_ASCII: [u16; 95] = [
  278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
  556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
  975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
  667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
  333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
  611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

// U+00A0 ..= U+00FF
#[rustfmt::skip]
const HELVETICA_LATIN1: [u16; 96] = [
  278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
  400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
  667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
  722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
  556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
  556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

#[rustfmt::skip]
const HELVETICA_BOLD_LATIN1: [u16; 96] = [
  278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
  400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
  722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
  722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
  556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
  611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// The WinAnsi code points outside Latin-1, with (regular, bold) widths.
const WIN_ANSI_EXTRA: [(char, u16, u16); 27] = [
  ('€', 556, 556),
  ('‚', 222, 278),
  ('ƒ', 556, 556),
  ('„', 333, 500),
  ('…', 1000, 1000),
  ('†', 556, 556),
  ('‡', 556, 556),
  ('ˆ', 333, 333),
  ('‰', 1000, 1000),
  ('Š', 667, 667),
  ('‹', 333, 333),
  ('Œ', 1000, 1000),
  ('Ž', 611, 611),
  ('‘', 222, 278),
  ('’', 222, 278),
  ('“', 333, 500),
  ('”', 333, 500),
  ('•', 350, 350),
  ('–', 556, 556),
  ('—', 1000, 1000),
  ('˜', 333, 333),
  ('™', 1000, 1000),
  ('š', 500, 556),
  ('›', 333, 333),
  ('œ', 944, 944),
  ('ž', 500, 500),
  ('Ÿ', 667, 667),
];

/// Width of `ch` in thousandths of an em, or `None` when the built-in fonts
/// cannot encode it.
pub fn char_units(font: FontFace, ch: char) -> Option<u16> {
  let bold = font == FontFace::Bold;
  match ch {
    ' '..='~' => {
      let i = ch as usize - 0x20;
      Some(if bold { HELVETICA_BOLD_ASCII[i] } else { HELVETICA_ASCII[i] })
    }
    '\u{A0}'..='\u{FF}' => {
      let i = ch as usize - 0xA0;
      Some(if bold { HELVETICA_BOLD_LATIN1[i] } else { HELVETICA_LATIN1[i] })
    }
    _ => WIN_ANSI_EXTRA
      .iter()
      .find(|(c, ..)| *c == ch)
      .map(|&(_, regular, bold_w)| if bold { bold_w } else { regular }),
  }
}

pub fn is_encodable(ch: char) -> bool { char_units(FontFace::Regular, ch).is_some() }

/// Width of `text` set in `font` at `size` points.
pub fn text_width(font: FontFace, size: f32, text: &str) -> Result<f32> {
  let mut units = 0u32;
  for ch in text.chars() {
    units += u32::from(char_units(font, ch).ok_or(RenderError::UnsupportedCharacter(ch))?);
  }
  Ok(units as f32 * size / 1000.0)
}

// ─── Substitution ────────────────────────────────────────────────────────────

/// Stand-ins for symbols language models like to emit.
#[rustfmt::skip]
const SUBSTITUTES: &[(char, &str)] = &[
  ('≥', ">="), ('≤', "<="), ('≠', "!="), ('≈', "~"), ('−', "-"),
  ('→', "->"), ('←', "<-"), ('↔', "<->"), ('⇒', "=>"), ('⇐', "<="),
  ('↑', "^"), ('↓', "v"),
  ('‐', "-"), ('‑', "-"), ('‒', "-"), ('―', "-"),
  ('′', "'"), ('″', "\""),
  ('✓', "v"), ('✔', "v"), ('✅', "v"), ('✗', "x"), ('✘', "x"), ('❌', "x"),
  ('★', "*"), ('☆', "*"),
  ('●', "•"), ('◦', "•"), ('▪', "•"), ('▸', "•"), ('►', "•"),
];

/// Printable characters with no stand-in.
const REPLACEMENT: &str = "?";

/// Format characters that occupy no space: joiners, variation selectors and
/// the byte order mark.
const INVISIBLE: &[char] =
  &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FE0E}', '\u{FE0F}', '\u{FEFF}'];

fn substitute(ch: char) -> &'static str {
  SUBSTITUTES.iter().find(|(c, _)| *c == ch).map_or(REPLACEMENT, |&(_, s)| s)
}

/// Map `text` onto the repertoire of the built-in fonts. Whitespace and
/// encodable characters pass through; other printable characters become a
/// close stand-in or `?`. Control characters are an error.
pub fn normalize(text: &str) -> Result<Cow<'_, str>> {
  if text.chars().all(|ch| ch.is_whitespace() || is_encodable(ch)) {
    return Ok(Cow::Borrowed(text));
  }

  let mut out = String::with_capacity(text.len());
  for ch in text.chars() {
    match ch {
      c if c.is_whitespace() || is_encodable(c) => out.push(c),
      c if c.is_control() => return Err(RenderError::UnsupportedCharacter(c)),
      c if INVISIBLE.contains(&c) => {}
      c => out.push_str(substitute(c)),
    }
  }
  Ok(Cow::Owned(out))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ascii_widths_match_afm() {
    assert_eq!(char_units(FontFace::Regular, ' '), Some(278));
    assert_eq!(char_units(FontFace::Regular, 'W'), Some(944));
    assert_eq!(char_units(FontFace::Regular, 'i'), Some(222));
    assert_eq!(char_units(FontFace::Bold, 'i'), Some(278));
    assert_eq!(char_units(FontFace::Regular, '~'), Some(584));
  }

  #[test]
  fn latin1_and_win_ansi_extras_are_encodable() {
    for ch in "ãçéõúÇÉ•–—€“”".chars() {
      assert!(is_encodable(ch), "{ch:?}");
    }
  }

  #[test]
  fn control_characters_and_emoji_are_not() {
    for ch in ['\u{7}', '\u{1F600}', '中', '\u{80}'] {
      assert!(!is_encodable(ch), "{ch:?}");
    }
  }

  #[test]
  fn text_width_scales_with_size() {
    let w = text_width(FontFace::Regular, 10.0, "ab").unwrap();
    assert!((w - 11.12).abs() < 1e-4, "{w}");
  }

  #[test]
  fn text_width_reports_offending_character() {
    assert!(matches!(
      text_width(FontFace::Bold, 12.0, "ok \u{1F600}"),
      Err(RenderError::UnsupportedCharacter('\u{1F600}'))
    ));
  }

  #[test]
  fn encodable_text_is_borrowed() {
    assert!(matches!(normalize("Satisfação ótima • bom"), Ok(Cow::Borrowed(_))));
  }

  #[test]
  fn common_symbols_get_stand_ins() {
    assert_eq!(normalize("Satisfação ≥ 80% → ótimo ✓").unwrap(), "Satisfação >= 80% -> ótimo v");
  }

  #[test]
  fn other_printable_characters_become_question_marks() {
    assert_eq!(normalize("Great job 🧹 中").unwrap(), "Great job ? ?");
  }

  #[test]
  fn invisible_format_characters_are_dropped() {
    assert_eq!(normalize("ok\u{200D}\u{FE0F}!").unwrap(), "ok!");
  }

  #[test]
  fn control_characters_are_rejected() {
    assert!(matches!(normalize("bell \u{7}"), Err(RenderError::UnsupportedCharacter('\u{7}'))));
    assert!(matches!(normalize("c1 \u{80}"), Err(RenderError::UnsupportedCharacter('\u{80}'))));
  }

  #[test]
  fn every_stand_in_is_encodable() {
    for (ch, stand_in) in SUBSTITUTES {
      assert!(stand_in.chars().all(is_encodable), "{ch:?} -> {stand_in:?}");
    }
  }
}

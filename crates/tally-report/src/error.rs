//! Error type for `tally-report`.

use thiserror::Error;

/// Why a document could not be rendered. Callers fall back to the plain-text
/// artifact on any of these.
#[derive(Debug, Error)]
pub enum RenderError {
  #[error("character {0:?} cannot be encoded in the built-in PDF fonts")]
  UnsupportedCharacter(char),

  #[error("style {style} is degenerate: {reason}")]
  InvalidStyle {
    style:  &'static str,
    reason: &'static str,
  },

  #[error("page geometry leaves no room for content: {0}")]
  InvalidGeometry(String),

  #[error("pdf serialization failed: {0}")]
  Pdf(String),

  #[error("layout engine panicked: {0}")]
  Panicked(String),
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;

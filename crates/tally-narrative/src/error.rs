//! Error types for `tally-narrative`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no API key configured for the narrative service")]
  MissingApiKey,

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("narrative service returned {status}: {body}")]
  Status { status: u16, body: String },

  #[error("narrative service returned no content")]
  EmptyCompletion,

  #[error("reading prompt template {path}: {source}")]
  Prompt {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

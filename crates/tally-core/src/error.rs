//! Error types for `tally-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("sector must not be empty")]
  EmptySector,

  #[error("service quality must not be empty")]
  EmptyServiceQuality,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Response types: one stored satisfaction survey submission.
//!
//! A response is an immutable record. It is appended once by the store and
//! never updated or deleted afterwards.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The survey token that marks material as missing. Any other token, including
/// an empty one, means nothing was missing.
pub const MATERIAL_MISSING_TOKEN: &str = "Sim";

/// Coerce the survey's material-missing answer into a boolean.
pub fn parse_material_missing(token: &str) -> bool { token == MATERIAL_MISSING_TOKEN }

// ─── Service quality ─────────────────────────────────────────────────────────

/// The service-quality rating picked on the survey form.
///
/// Labels outside the known set are kept verbatim in [`ServiceQuality::Other`]
/// so rows written by a different form revision stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ServiceQuality {
  Excellent,
  Good,
  Fair,
  Poor,
  Other(String),
}

impl ServiceQuality {
  /// The label as stored in the database and shown in reports.
  pub fn as_str(&self) -> &str {
    match self {
      Self::Excellent => "Excelente",
      Self::Good => "Bom",
      Self::Fair => "Regular",
      Self::Poor => "Ruim",
      Self::Other(label) => label,
    }
  }
}

impl fmt::Display for ServiceQuality {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for ServiceQuality {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let label = s.trim();
    if label.is_empty() {
      return Err(Error::EmptyServiceQuality);
    }
    Ok(match label.to_lowercase().as_str() {
      "excelente" => Self::Excellent,
      "bom" => Self::Good,
      "regular" => Self::Fair,
      "ruim" => Self::Poor,
      _ => Self::Other(label.to_owned()),
    })
  }
}

impl From<ServiceQuality> for String {
  fn from(q: ServiceQuality) -> Self { q.as_str().to_owned() }
}

impl TryFrom<String> for ServiceQuality {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { s.parse() }
}

// ─── Stored record ───────────────────────────────────────────────────────────

/// A persisted survey response. `id` and `recorded_at` are assigned by the
/// store on insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SatisfactionResponse {
  pub id:                    i64,
  pub sector:                String,
  pub material_missing:      bool,
  pub missing_material_name: Option<String>,
  pub service_quality:       ServiceQuality,
  pub message:               Option<String>,
  pub recorded_at:           DateTime<Utc>,
}

impl SatisfactionResponse {
  /// The free-text comment, if one was left. Empty comments count as absent.
  pub fn comment(&self) -> Option<&str> {
    self.message.as_deref().filter(|m| !m.trim().is_empty())
  }
}

// ─── Insert payload ──────────────────────────────────────────────────────────

/// Everything needed to record a new response; the store fills in the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewResponse {
  pub sector:                String,
  pub material_missing:      bool,
  pub missing_material_name: Option<String>,
  pub service_quality:       ServiceQuality,
  pub message:               Option<String>,
}

impl NewResponse {
  /// Build a payload from the raw survey form answers.
  ///
  /// `material_missing` is the form token (see [`parse_material_missing`]).
  /// Blank optional fields are normalised to `None`.
  pub fn from_form(
    sector: &str,
    material_missing: &str,
    missing_material_name: Option<&str>,
    service_quality: &str,
    message: Option<&str>,
  ) -> Result<Self> {
    let sector = sector.trim();
    if sector.is_empty() {
      return Err(Error::EmptySector);
    }
    Ok(Self {
      sector:                sector.to_owned(),
      material_missing:      parse_material_missing(material_missing),
      missing_material_name: non_blank(missing_material_name),
      service_quality:       service_quality.parse()?,
      message:               non_blank(message),
    })
  }
}

fn non_blank(s: Option<&str>) -> Option<String> {
  s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

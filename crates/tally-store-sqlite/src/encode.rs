//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so that lexical order in SQL matches chronological
//! order.

use chrono::{DateTime, SecondsFormat, Utc};
use tally_core::response::{SatisfactionResponse, ServiceQuality};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Micros, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ServiceQuality ──────────────────────────────────────────────────────────

pub fn encode_quality(q: &ServiceQuality) -> String { q.as_str().to_owned() }

pub fn decode_quality(s: &str) -> Result<ServiceQuality> { Ok(s.parse()?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `satisfaction_responses` row.
pub struct RawResponse {
  pub id:                    i64,
  pub sector:                String,
  pub material_missing:      bool,
  pub missing_material_name: Option<String>,
  pub service_quality:       String,
  pub message:               Option<String>,
  pub recorded_at:           String,
}

impl RawResponse {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                    row.get(0)?,
      sector:                row.get(1)?,
      material_missing:      row.get(2)?,
      missing_material_name: row.get(3)?,
      service_quality:       row.get(4)?,
      message:               row.get(5)?,
      recorded_at:           row.get(6)?,
    })
  }

  pub fn into_response(self) -> Result<SatisfactionResponse> {
    Ok(SatisfactionResponse {
      id:                    self.id,
      sector:                self.sector,
      material_missing:      self.material_missing,
      missing_material_name: self.missing_material_name,
      service_quality:       decode_quality(&self.service_quality)?,
      message:               self.message,
      recorded_at:           decode_dt(&self.recorded_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_are_fixed_width() {
    let whole = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let fractional = whole + chrono::Duration::microseconds(1_500);
    assert_eq!(encode_dt(whole), "2024-03-01T09:00:00.000000Z");
    assert_eq!(encode_dt(fractional), "2024-03-01T09:00:00.001500Z");
    assert!(encode_dt(whole) < encode_dt(fractional));
  }

  #[test]
  fn timestamp_roundtrip() {
    let at = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
    assert_eq!(decode_dt(&encode_dt(at)).unwrap(), at);
  }

  #[test]
  fn garbage_timestamp_is_an_error() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}

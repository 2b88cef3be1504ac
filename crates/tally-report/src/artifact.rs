//! The downloadable result of a report request.

use chrono::NaiveDateTime;

use crate::RenderedDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
  Pdf,
  /// The raw narrative, used when the PDF could not be produced.
  Text,
}

impl ArtifactKind {
  pub fn extension(self) -> &'static str {
    match self {
      Self::Pdf => "pdf",
      Self::Text => "txt",
    }
  }

  pub fn mime_type(self) -> &'static str {
    match self {
      Self::Pdf => "application/pdf",
      Self::Text => "text/plain; charset=utf-8",
    }
  }
}

/// `executive_report_YYYYmmdd_HHMMSS.<ext>`
pub fn file_name(kind: ArtifactKind, generated_at: NaiveDateTime) -> String {
  format!(
    "executive_report_{}.{}",
    generated_at.format("%Y%m%d_%H%M%S"),
    kind.extension()
  )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
  pub kind:      ArtifactKind,
  pub file_name: String,
  pub bytes:     Vec<u8>,
}

impl ReportArtifact {
  pub fn pdf(document: RenderedDocument, generated_at: NaiveDateTime) -> Self {
    Self {
      kind:      ArtifactKind::Pdf,
      file_name: file_name(ArtifactKind::Pdf, generated_at),
      bytes:     document.bytes,
    }
  }

  /// The narrative as-is, UTF-8 encoded.
  pub fn text(narrative: &str, generated_at: NaiveDateTime) -> Self {
    Self {
      kind:      ArtifactKind::Text,
      file_name: file_name(ArtifactKind::Text, generated_at),
      bytes:     narrative.as_bytes().to_vec(),
    }
  }

  pub fn is_pdf(&self) -> bool { self.kind == ArtifactKind::Pdf }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, 4).unwrap().and_hms_opt(16, 7, 9).unwrap()
  }

  #[test]
  fn file_names_carry_timestamp_and_extension() {
    assert_eq!(file_name(ArtifactKind::Pdf, at()), "executive_report_20251104_160709.pdf");
    assert_eq!(file_name(ArtifactKind::Text, at()), "executive_report_20251104_160709.txt");
  }

  #[test]
  fn text_artifact_holds_narrative_verbatim() {
    let narrative = "## Summary\n- **Good** 👍\n";
    let artifact = ReportArtifact::text(narrative, at());
    assert!(!artifact.is_pdf());
    assert_eq!(artifact.bytes, narrative.as_bytes());
    assert_eq!(artifact.kind.mime_type(), "text/plain; charset=utf-8");
  }
}

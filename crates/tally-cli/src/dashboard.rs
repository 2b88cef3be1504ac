//! The dashboard controller shared by the terminal UI and the headless
//! subcommands.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tally_core::{
  batch::{BatchStats, ResponseBatch},
  response::NewResponse,
  store::ResponseStore,
};
use tally_narrative::{CompletionClient, NarrativeGenerator};
use tally_report::{ReportArtifact, ReportStats, Renderer};
use thiserror::Error;

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum DashboardError {
  #[error("no survey responses are available")]
  NoData,

  #[error("the narrative service is not configured (set an API key)")]
  NarrativeDisabled,

  #[error("the narrative service did not return any text")]
  NarrativeFailed,

  #[error("failed to write {}: {source}", path.display())]
  Save {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },
}

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;

// ─── Session ─────────────────────────────────────────────────────────────────

/// Per-run state. Holds the latest sentiment summary under
/// [`Session::SENTIMENT_KEY`]; each analysis overwrites the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
  sentiment_analysis: Option<String>,
}

impl Session {
  pub const SENTIMENT_KEY: &'static str = "sentiment_analysis";

  pub fn sentiment_analysis(&self) -> Option<&str> { self.sentiment_analysis.as_deref() }

  pub fn get(&self, key: &str) -> Option<&str> {
    match key {
      Self::SENTIMENT_KEY => self.sentiment_analysis(),
      _ => None,
    }
  }

  fn store_sentiment(&mut self, text: String) { self.sentiment_analysis = Some(text); }
}

/// A drafted report and the file it was rendered to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutiveReport {
  pub narrative: String,
  pub artifact:  ReportArtifact,
}

// ─── Controller ──────────────────────────────────────────────────────────────

pub struct Dashboard<S, C> {
  store:     S,
  narrative: Option<NarrativeGenerator<C>>,
  renderer:  Renderer,
  session:   Session,
}

impl<S, C> Dashboard<S, C> {
  /// `narrative` is `None` when no API key is configured; the analysis and
  /// report actions then fail with [`DashboardError::NarrativeDisabled`].
  pub fn new(store: S, narrative: Option<NarrativeGenerator<C>>, renderer: Renderer) -> Self {
    Self { store, narrative, renderer, session: Session::default() }
  }

  pub fn session(&self) -> &Session { &self.session }

  pub fn narrative_enabled(&self) -> bool { self.narrative.is_some() }
}

impl<S: ResponseStore, C: CompletionClient> Dashboard<S, C> {
  pub async fn check_connection(&self) -> bool { self.store.check_connection().await }

  /// Every stored response. An empty store, or one that cannot be reached,
  /// is reported as [`DashboardError::NoData`].
  pub async fn load(&self) -> Result<ResponseBatch> {
    let batch = self.store.fetch_all().await;
    if batch.is_empty() {
      tracing::info!("no survey responses to show");
      return Err(DashboardError::NoData);
    }
    tracing::debug!(count = batch.len(), "responses loaded");
    Ok(batch)
  }

  pub async fn submit(&self, response: NewResponse) -> bool {
    let sector = response.sector.clone();
    let ok = self.store.insert_response(response).await;
    if ok {
      tracing::info!(%sector, "survey response recorded");
    }
    ok
  }

  fn generator(&self) -> Result<&NarrativeGenerator<C>> {
    self.narrative.as_ref().ok_or(DashboardError::NarrativeDisabled)
  }

  /// Summarise the sentiment of `batch` and cache the result in the session.
  pub async fn analyze(&mut self, batch: &ResponseBatch) -> Result<String> {
    if batch.is_empty() {
      return Err(DashboardError::NoData);
    }
    let text = self
      .generator()?
      .summarize_sentiment(batch)
      .await
      .ok_or(DashboardError::NarrativeFailed)?;
    self.session.store_sentiment(text.clone());
    Ok(text)
  }

  /// Draft the executive report for `batch` and render it. The cached
  /// sentiment summary is included when one exists. A render failure yields
  /// a plain-text artifact instead of an error.
  pub async fn executive_report(
    &self,
    batch: &ResponseBatch,
    generated_at: NaiveDateTime,
  ) -> Result<ExecutiveReport> {
    let stats = BatchStats::from_batch(batch).ok_or(DashboardError::NoData)?;
    let narrative = self
      .generator()?
      .draft_report(&stats, self.session.sentiment_analysis())
      .await
      .ok_or(DashboardError::NarrativeFailed)?;

    let artifact = self
      .renderer
      .artifact_at(&narrative, &ReportStats::from(&stats), generated_at);
    if !artifact.is_pdf() {
      tracing::warn!(file = %artifact.file_name, "offering the narrative as plain text");
    }
    Ok(ExecutiveReport { narrative, artifact })
  }
}

/// Write `artifact` into `dir`, creating the directory when needed.
pub fn save_artifact(artifact: &ReportArtifact, dir: &Path) -> Result<PathBuf> {
  let path = dir.join(&artifact.file_name);
  let save_err = |source| DashboardError::Save { path: path.clone(), source };

  std::fs::create_dir_all(dir).map_err(save_err)?;
  std::fs::write(&path, &artifact.bytes).map_err(save_err)?;
  tracing::info!(path = %path.display(), bytes = artifact.bytes.len(), "report saved");
  Ok(path)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use tally_core::response::ServiceQuality;
  use tally_narrative::CompletionRequest;
  use tally_report::ArtifactKind;

  use super::*;
  use crate::testing::{MemoryStore, ScriptedClient, generator};

  fn dashboard(
    store: MemoryStore,
    replies: Option<&[Option<&str>]>,
  ) -> Dashboard<MemoryStore, ScriptedClient> {
    let narrative = replies.map(|r| generator(ScriptedClient::new(r)));
    Dashboard::new(store, narrative, Renderer::default())
  }

  fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 9, 2).unwrap().and_hms_opt(8, 15, 0).unwrap()
  }

  fn requests(d: &Dashboard<MemoryStore, ScriptedClient>) -> Vec<CompletionRequest> {
    d.narrative
      .as_ref()
      .map(|g| g.client().seen.lock().unwrap().clone())
      .unwrap_or_default()
  }

  // ── Load & submit ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn empty_store_is_no_data() {
    let d = dashboard(MemoryStore::default(), Some(&[]));
    assert!(matches!(d.load().await, Err(DashboardError::NoData)));
  }

  #[tokio::test]
  async fn unreachable_store_is_no_data_and_fails_check() {
    let d = dashboard(MemoryStore { unreachable: true, ..Default::default() }, None);
    assert!(!d.check_connection().await);
    assert!(matches!(d.load().await, Err(DashboardError::NoData)));
  }

  #[tokio::test]
  async fn submitted_response_is_loaded_back() {
    let d = dashboard(MemoryStore::default(), None);
    let input = NewResponse::from_form("Reception", "Sim", Some("Soap"), "Excelente", None).unwrap();
    assert!(d.submit(input).await);

    let batch = d.load().await.unwrap();
    assert_eq!(batch.len(), 1);
    let r = &batch.as_slice()[0];
    assert!(r.material_missing);
    assert_eq!(r.service_quality, ServiceQuality::Excellent);
  }

  // ── Analysis ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn analyze_caches_and_overwrites_sentiment() {
    let mut d = dashboard(MemoryStore::with_rows(3), Some(&[Some("First pass."), Some("Second pass.")]));
    let batch = d.load().await.unwrap();

    assert_eq!(d.analyze(&batch).await.unwrap(), "First pass.");
    assert_eq!(d.session().get(Session::SENTIMENT_KEY), Some("First pass."));

    d.analyze(&batch).await.unwrap();
    assert_eq!(d.session().sentiment_analysis(), Some("Second pass."));
  }

  #[tokio::test]
  async fn analyze_without_key_is_disabled() {
    let mut d = dashboard(MemoryStore::with_rows(2), None);
    let batch = d.load().await.unwrap();
    assert!(matches!(d.analyze(&batch).await, Err(DashboardError::NarrativeDisabled)));
    assert!(!d.narrative_enabled());
  }

  #[tokio::test]
  async fn analyze_failure_leaves_session_untouched() {
    let mut d = dashboard(MemoryStore::with_rows(2), Some(&[None]));
    let batch = d.load().await.unwrap();
    assert!(matches!(d.analyze(&batch).await, Err(DashboardError::NarrativeFailed)));
    assert_eq!(d.session().sentiment_analysis(), None);
  }

  #[tokio::test]
  async fn analyze_empty_batch_is_no_data() {
    let mut d = dashboard(MemoryStore::default(), Some(&[Some("unused")]));
    assert!(matches!(
      d.analyze(&ResponseBatch::empty()).await,
      Err(DashboardError::NoData)
    ));
    assert!(requests(&d).is_empty());
  }

  // ── Executive report ────────────────────────────────────────────────────

  #[tokio::test]
  async fn report_on_empty_batch_is_no_data() {
    let d = dashboard(MemoryStore::default(), Some(&[Some("## Report")]));
    assert!(matches!(
      d.executive_report(&ResponseBatch::empty(), at()).await,
      Err(DashboardError::NoData)
    ));
  }

  #[tokio::test]
  async fn report_renders_pdf_and_reuses_cached_sentiment() {
    let mut d = dashboard(
      MemoryStore::with_rows(6),
      Some(&[Some("Staff are praised."), Some("## Summary\nService is **good**.")]),
    );
    let batch = d.load().await.unwrap();
    d.analyze(&batch).await.unwrap();

    let report = d.executive_report(&batch, at()).await.unwrap();
    assert_eq!(report.narrative, "## Summary\nService is **good**.");
    assert_eq!(report.artifact.kind, ArtifactKind::Pdf);
    assert_eq!(report.artifact.file_name, "executive_report_20240902_081500.pdf");

    let sent = requests(&d);
    assert_eq!(sent.len(), 2);
    assert!(sent[1].user.contains("- Total responses: 6"));
    assert!(sent[1].user.ends_with("Staff are praised."));
  }

  #[tokio::test]
  async fn report_without_prior_analysis_uses_placeholder() {
    let d = dashboard(MemoryStore::with_rows(2), Some(&[Some("## Summary")]));
    let batch = d.load().await.unwrap();
    d.executive_report(&batch, at()).await.unwrap();
    assert!(requests(&d)[0].user.ends_with(tally_narrative::prompt::NO_SENTIMENT_PLACEHOLDER));
  }

  #[tokio::test]
  async fn unrenderable_report_falls_back_to_text() {
    let narrative = "## Summary\nCleaning crew rocks \u{1B}[1m";
    let d = dashboard(MemoryStore::with_rows(2), Some(&[Some(narrative)]));
    let batch = d.load().await.unwrap();

    let report = d.executive_report(&batch, at()).await.unwrap();
    assert_eq!(report.artifact.kind, ArtifactKind::Text);
    assert_eq!(report.artifact.bytes, narrative.as_bytes());
  }

  #[tokio::test]
  async fn report_failure_is_narrative_failed() {
    let d = dashboard(MemoryStore::with_rows(2), Some(&[None]));
    let batch = d.load().await.unwrap();
    assert!(matches!(
      d.executive_report(&batch, at()).await,
      Err(DashboardError::NarrativeFailed)
    ));
  }

  // ── Saving ──────────────────────────────────────────────────────────────

  #[test]
  fn save_artifact_creates_directory_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("reports/2024");
    let artifact = ReportArtifact::text("plain narrative", at());

    let path = save_artifact(&artifact, &out).unwrap();
    assert_eq!(path, out.join("executive_report_20240902_081500.txt"));
    assert_eq!(std::fs::read_to_string(path).unwrap(), "plain narrative");
  }

  #[test]
  fn save_artifact_reports_unwritable_target() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "x").unwrap();
    let artifact = ReportArtifact::text("n", at());
    assert!(matches!(
      save_artifact(&artifact, &blocker.join("sub")),
      Err(DashboardError::Save { .. })
    ));
  }
}

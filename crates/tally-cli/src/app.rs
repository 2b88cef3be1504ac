//! Terminal dashboard state machine and key dispatcher.
//!
//! Remote calls are slow, so a key that starts one only records it as
//! [`Action`] pending; the event loop redraws (showing the progress message)
//! and then calls [`App::run_pending`].

use std::{io, path::PathBuf};

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tally_core::{
  batch::{BatchStats, ResponseBatch},
  store::ResponseStore,
};
use tally_narrative::CompletionClient;

use crate::dashboard::{Dashboard, DashboardError, ExecutiveReport, save_artifact};

// ─── Tabs ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
  Analysis,
  Report,
}

impl Tab {
  pub const ALL: [Tab; 2] = [Tab::Analysis, Tab::Report];

  pub fn title(self) -> &'static str {
    match self {
      Self::Analysis => "AI analysis",
      Self::Report => "Executive report",
    }
  }

  pub fn index(self) -> usize {
    match self {
      Self::Analysis => 0,
      Self::Report => 1,
    }
  }

  fn toggle(self) -> Self {
    match self {
      Self::Analysis => Self::Report,
      Self::Report => Self::Analysis,
    }
  }
}

/// Work queued by a key press and run after the next redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Refresh,
  Analyze,
  Report,
  Save,
}

impl Action {
  fn progress(self) -> &'static str {
    match self {
      Self::Refresh => "Loading responses…",
      Self::Analyze => "Analysing sentiment…",
      Self::Report => "Drafting executive report…",
      Self::Save => "Saving report…",
    }
  }
}

/// Discard every input event already queued, returning how many were dropped.
/// Keys typed while an action was running are not replayed.
pub fn drain_input<E>(
  mut poll: impl FnMut() -> io::Result<bool>,
  mut read: impl FnMut() -> io::Result<E>,
) -> io::Result<usize> {
  let mut dropped = 0;
  while poll()? {
    read()?;
    dropped += 1;
  }
  Ok(dropped)
}

// ─── App ──────────────────────────────────────────────────────────────────────

pub struct App<S, C> {
  pub dashboard:  Dashboard<S, C>,
  pub tab:        Tab,
  pub connected:  bool,
  pub batch:      Option<ResponseBatch>,
  pub stats:      Option<BatchStats>,
  pub report:     Option<ExecutiveReport>,
  pub saved_to:   Option<PathBuf>,
  pub output_dir: PathBuf,
  /// Scroll offset of the active tab's text.
  pub scroll:     u16,
  pub status_msg: String,
  pub pending:    Option<Action>,
}

impl<S, C> App<S, C> {
  pub fn new(dashboard: Dashboard<S, C>, output_dir: PathBuf) -> Self {
    Self {
      dashboard,
      tab: Tab::Analysis,
      connected: false,
      batch: None,
      stats: None,
      report: None,
      saved_to: None,
      output_dir,
      scroll: 0,
      status_msg: String::new(),
      pending: None,
    }
  }

  pub fn sentiment(&self) -> Option<&str> { self.dashboard.session().sentiment_analysis() }
}

impl<S: ResponseStore, C: CompletionClient> App<S, C> {
  // ── Data loading ──────────────────────────────────────────────────────────

  /// Re-check the connection and reload every response.
  pub async fn refresh(&mut self) {
    self.connected = self.dashboard.check_connection().await;
    match self.dashboard.load().await {
      Ok(batch) => {
        self.stats = BatchStats::from_batch(&batch);
        self.status_msg = format!("{} responses loaded.", batch.len());
        self.batch = Some(batch);
      }
      Err(e) => {
        self.batch = None;
        self.stats = None;
        self.status_msg = if self.connected {
          "No survey responses yet.".into()
        } else {
          format!("Database unavailable: {e}")
        };
      }
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }
    if self.pending.is_some() {
      return true;
    }

    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
        self.switch_to(self.tab.toggle());
      }
      KeyCode::Char('1') => self.switch_to(Tab::Analysis),
      KeyCode::Char('2') => self.switch_to(Tab::Report),

      KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
      KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),

      KeyCode::Char('r') => self.queue(Action::Refresh),
      KeyCode::Enter | KeyCode::Char('g') => match self.tab {
        Tab::Analysis => self.queue(Action::Analyze),
        Tab::Report => self.queue(Action::Report),
      },
      KeyCode::Char('s') if self.tab == Tab::Report => {
        if self.report.is_some() {
          self.queue(Action::Save);
        } else {
          self.status_msg = "Generate a report first.".into();
        }
      }

      _ => {}
    }
    true
  }

  fn switch_to(&mut self, tab: Tab) {
    if self.tab != tab {
      self.tab = tab;
      self.scroll = 0;
    }
  }

  fn queue(&mut self, action: Action) {
    self.status_msg = action.progress().into();
    self.pending = Some(action);
  }

  // ── Actions ───────────────────────────────────────────────────────────────

  /// Run the queued action, if any, to completion.
  pub async fn run_pending(&mut self) {
    let Some(action) = self.pending.take() else { return };
    match action {
      Action::Refresh => self.refresh().await,
      Action::Analyze => self.analyze().await,
      Action::Report => self.generate_report().await,
      Action::Save => self.save(),
    }
  }

  async fn analyze(&mut self) {
    let Some(batch) = self.batch.as_ref() else {
      self.status_msg = DashboardError::NoData.to_string();
      return;
    };
    self.status_msg = match self.dashboard.analyze(batch).await {
      Ok(_) => "Sentiment analysis complete.".into(),
      Err(e) => format!("Analysis unavailable: {e}"),
    };
    self.scroll = 0;
  }

  async fn generate_report(&mut self) {
    let Some(batch) = self.batch.as_ref() else {
      self.status_msg = DashboardError::NoData.to_string();
      return;
    };
    match self.dashboard.executive_report(batch, Local::now().naive_local()).await {
      Ok(report) => {
        self.status_msg = if report.artifact.is_pdf() {
          "Report ready. Press s to save the PDF.".into()
        } else {
          "PDF rendering failed; press s to save the report as text.".into()
        };
        self.report = Some(report);
        self.saved_to = None;
        self.scroll = 0;
      }
      Err(e) => self.status_msg = format!("Report unavailable: {e}"),
    }
  }

  fn save(&mut self) {
    let Some(report) = self.report.as_ref() else { return };
    match save_artifact(&report.artifact, &self.output_dir) {
      Ok(path) => {
        self.status_msg = format!("Saved {}", path.display());
        self.saved_to = Some(path);
      }
      Err(e) => self.status_msg = e.to_string(),
    }
  }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

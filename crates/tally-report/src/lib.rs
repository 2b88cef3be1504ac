//! `tally-report` renders an executive-report narrative to PDF.
//!
//! The narrative is interpreted line by line into styled [`Block`]s, framed
//! by a title preamble and an attribution footer, laid out on A4 pages, and
//! written with the built-in Helvetica faces.
//!
//! ```no_run
//! use tally_report::{Branding, Renderer, ReportStats};
//! # fn demo(stats: ReportStats) {
//! let renderer = Renderer::new(Branding::default());
//! match renderer.render("## Summary\nAll good.", &stats) {
//!   Some(doc) => println!("{} pages", doc.page_count),
//!   None => println!("fall back to text"),
//! }
//! # }
//! ```

pub mod artifact;
pub mod blocks;
pub mod error;
pub mod layout;
pub mod metrics;
mod pdf;
pub mod style;


use std::{
  panic::{self, AssertUnwindSafe},
  sync::{Mutex, PoisonError},
};

use chrono::{Local, NaiveDateTime};

pub use self::{
  artifact::{ArtifactKind, ReportArtifact},
  blocks::{Block, Branding, ReportStats, Run},
  error::{RenderError, Result},
  layout::{Page, PageGeometry},
};

/// A finished PDF together with the blocks it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
  pub bytes:      Vec<u8>,
  pub page_count: usize,
  pub blocks:     Vec<Block>,
}

/// Renders narratives with fixed branding and page geometry.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
  branding: Branding,
  geometry: PageGeometry,
}

impl Renderer {
  pub fn new(branding: Branding) -> Self { Self { branding, geometry: PageGeometry::A4 } }

  pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
    self.geometry = geometry;
    self
  }

  pub fn branding(&self) -> &Branding { &self.branding }

  /// Lay the document out without serialising it.
  pub fn pages(
    &self,
    narrative: &str,
    stats: &ReportStats,
    generated_at: NaiveDateTime,
  ) -> Result<Vec<Page>> {
    let blocks = blocks::document(&self.branding, stats, narrative, generated_at);
    layout::layout(&blocks, &self.geometry)
  }

  /// Render with an explicit generation time. Panics inside the layout or
  /// PDF writer are caught and reported as [`RenderError::Panicked`].
  pub fn try_render_at(
    &self,
    narrative: &str,
    stats: &ReportStats,
    generated_at: NaiveDateTime,
  ) -> Result<RenderedDocument> {
    guarded(|| {
      let blocks = blocks::document(&self.branding, stats, narrative, generated_at);
      let pages = layout::layout(&blocks, &self.geometry)?;
      let bytes = pdf::write(&self.branding.title, &pages, &self.geometry)?;
      Ok(RenderedDocument { bytes, page_count: pages.len(), blocks })
    })
  }

  pub fn try_render(&self, narrative: &str, stats: &ReportStats) -> Result<RenderedDocument> {
    self.try_render_at(narrative, stats, Local::now().naive_local())
  }

  /// Render, or `None` (logged) on any failure.
  pub fn render_at(
    &self,
    narrative: &str,
    stats: &ReportStats,
    generated_at: NaiveDateTime,
  ) -> Option<RenderedDocument> {
    match self.try_render_at(narrative, stats, generated_at) {
      Ok(doc) => {
        tracing::debug!(pages = doc.page_count, bytes = doc.bytes.len(), "report rendered");
        Some(doc)
      }
      Err(e) => {
        tracing::warn!(error = %e, "report rendering failed");
        None
      }
    }
  }

  pub fn render(&self, narrative: &str, stats: &ReportStats) -> Option<RenderedDocument> {
    self.render_at(narrative, stats, Local::now().naive_local())
  }

  /// The PDF artifact, or the narrative as plain text when rendering fails.
  pub fn artifact_at(
    &self,
    narrative: &str,
    stats: &ReportStats,
    generated_at: NaiveDateTime,
  ) -> ReportArtifact {
    match self.render_at(narrative, stats, generated_at) {
      Some(doc) => ReportArtifact::pdf(doc, generated_at),
      None => ReportArtifact::text(narrative, generated_at),
    }
  }
}

/// Serialises panic hook swaps across threads.
static PANIC_HOOK: Mutex<()> = Mutex::new(());

/// Run `f`, turning a panic into [`RenderError::Panicked`]. While `f` runs the
/// panic hook logs through `tracing` instead of printing to stderr, which
/// belongs to the terminal dashboard.
fn guarded<T>(f: impl FnOnce() -> Result<T>) -> Result<T> {
  let _hook = PANIC_HOOK.lock().unwrap_or_else(PoisonError::into_inner);
  let previous = panic::take_hook();
  panic::set_hook(Box::new(|info| tracing::error!(%info, "panic while rendering")));
  let attempt = panic::catch_unwind(AssertUnwindSafe(f));
  panic::set_hook(previous);
  attempt.unwrap_or_else(|payload| Err(RenderError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
  payload
    .downcast_ref::<&str>()
    .map(|s| (*s).to_owned())
    .or_else(|| payload.downcast_ref::<String>().cloned())
    .unwrap_or_else(|| "unknown panic".to_owned())
}

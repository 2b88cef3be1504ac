//! Layered settings: optional TOML file, then `TALLY_*` environment variables.
//!
//! ```toml
//! [database]
//! path = "tally.db"
//!
//! [narrative]
//! api_key = "sk-..."
//! model   = "gpt-4.1"
//!
//! [report]
//! output_dir = "reports"
//!
//! [report.branding]
//! title = "Executive Report"
//! ```
//!
//! Environment variables use `__` between sections, e.g.
//! `TALLY_DATABASE__PATH=/var/lib/tally.db`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use tally_narrative::NarrativeConfig;
use tally_report::Branding;

/// Conventional variable consulted when no key is configured under `narrative`.
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub database:  DatabaseSettings,
  pub narrative: NarrativeConfig,
  pub report:    ReportSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
  pub path: PathBuf,
}

impl Default for DatabaseSettings {
  fn default() -> Self { Self { path: PathBuf::from("tally.db") } }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
  /// Directory saved artifacts are written to.
  pub output_dir: PathBuf,
  pub branding:   Branding,
}

impl Default for ReportSettings {
  fn default() -> Self {
    Self { output_dir: PathBuf::from("reports"), branding: Branding::default() }
  }
}

impl Settings {
  /// Read `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let raw = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("TALLY")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .with_context(|| format!("failed to read configuration from {}", path.display()))?;

    let settings: Self = raw
      .try_deserialize()
      .context("failed to deserialise settings")?;

    Ok(settings.with_api_key_fallback(std::env::var(OPENAI_KEY_VAR).ok()).expand_paths())
  }

  /// Use `fallback` as the API key when none is configured.
  pub fn with_api_key_fallback(mut self, fallback: Option<String>) -> Self {
    let configured = self.narrative.api_key.as_deref().is_some_and(|k| !k.trim().is_empty());
    if !configured {
      self.narrative.api_key = fallback;
    }
    self
  }

  fn expand_paths(mut self) -> Self {
    self.database.path = expand_tilde(&self.database.path);
    self.report.output_dir = expand_tilde(&self.report.output_dir);
    self
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

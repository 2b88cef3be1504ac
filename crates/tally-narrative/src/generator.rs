//! [`NarrativeGenerator`]: the two request shapes and their fail-closed
//! contract.

use std::path::PathBuf;

use serde::Deserialize;
use tally_core::batch::{BatchStats, ResponseBatch};

use crate::{
  client::{CompletionClient, CompletionRequest, OpenAiClient},
  prompt::{PromptSource, PromptTemplates, sentiment_lines, statistics_block},
  Result,
};

/// Upper bound on responses included in a sentiment request.
pub const SAMPLING_CAP: usize = 50;

const MAX_TOKENS: u32 = 3000;
const SENTIMENT_TEMPERATURE: f32 = 0.5;
const REPORT_TEMPERATURE: f32 = 0.3;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Narrative service settings, deserialised from the `[narrative]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
  /// Without a key the narrative path is disabled.
  pub api_key:          Option<String>,
  pub endpoint:         String,
  pub model:            String,
  /// Whole-request HTTP timeout.
  pub timeout_secs:     u64,
  pub sentiment_prompt: PathBuf,
  pub report_prompt:    PathBuf,
}

impl Default for NarrativeConfig {
  fn default() -> Self {
    Self {
      api_key:          None,
      endpoint:         "https://api.openai.com/v1".into(),
      model:            "gpt-4.1".into(),
      timeout_secs:     60,
      sentiment_prompt: PathBuf::from("prompts/sentiment_analysis.txt"),
      report_prompt:    PathBuf::from("prompts/executive_report.txt"),
    }
  }
}

impl NarrativeConfig {
  pub fn prompt_templates(&self) -> PromptTemplates {
    PromptTemplates {
      sentiment: PromptSource::File(self.sentiment_prompt.clone()),
      report:    PromptSource::File(self.report_prompt.clone()),
    }
  }
}

// ─── Generator ───────────────────────────────────────────────────────────────

/// Builds narrative requests and sends them through a [`CompletionClient`].
#[derive(Debug, Clone)]
pub struct NarrativeGenerator<C> {
  client:  C,
  prompts: PromptTemplates,
}

impl NarrativeGenerator<OpenAiClient> {
  /// Build the production generator. Returns `None` (and logs why) when the
  /// API key is missing or the HTTP client cannot be built, which disables
  /// the narrative path without failing startup.
  pub fn from_config(config: &NarrativeConfig) -> Option<Self> {
    match OpenAiClient::new(config) {
      Ok(client) => {
        tracing::info!(model = client.model(), "narrative service enabled");
        Some(Self::new(client, config.prompt_templates()))
      }
      Err(e) => {
        tracing::warn!(error = %e, "narrative service disabled");
        None
      }
    }
  }
}

impl<C: CompletionClient> NarrativeGenerator<C> {
  pub fn new(client: C, prompts: PromptTemplates) -> Self { Self { client, prompts } }

  pub fn client(&self) -> &C { &self.client }

  /// The request sent for a sentiment summary of `batch`.
  pub fn sentiment_request(&self, batch: &ResponseBatch) -> Result<CompletionRequest> {
    let input = sentiment_lines(batch, SAMPLING_CAP).join("\n");
    Ok(CompletionRequest {
      system:      self.prompts.sentiment.load()?,
      user:        format!("Analyze the following responses:\n\n{input}"),
      temperature: SENTIMENT_TEMPERATURE,
      max_tokens:  MAX_TOKENS,
    })
  }

  /// The request sent to draft the executive report.
  pub fn report_request(
    &self,
    stats: &BatchStats,
    sentiment: Option<&str>,
  ) -> Result<CompletionRequest> {
    Ok(CompletionRequest {
      system:      self.prompts.report.load()?,
      user:        format!(
        "Base the report on the following data:\n\n{}",
        statistics_block(stats, sentiment)
      ),
      temperature: REPORT_TEMPERATURE,
      max_tokens:  MAX_TOKENS,
    })
  }

  /// Summarise the sentiment of (at most [`SAMPLING_CAP`] of) the responses.
  ///
  /// Returns `None` for an empty batch or on any failure.
  pub async fn summarize_sentiment(&self, batch: &ResponseBatch) -> Option<String> {
    if batch.is_empty() {
      return None;
    }
    if batch.len() > SAMPLING_CAP {
      tracing::info!(
        total = batch.len(),
        cap = SAMPLING_CAP,
        "sentiment input truncated to the sampling cap"
      );
    }
    let request = match self.sentiment_request(batch) {
      Ok(r) => r,
      Err(e) => {
        tracing::warn!(error = %e, "sentiment prompt unavailable; no narrative produced");
        return None;
      }
    };
    self.send("sentiment", request).await
  }

  /// Draft the executive report from `stats` and, when available, a prior
  /// sentiment summary. Returns `None` on any failure.
  pub async fn draft_report(&self, stats: &BatchStats, sentiment: Option<&str>) -> Option<String> {
    let request = match self.report_request(stats, sentiment) {
      Ok(r) => r,
      Err(e) => {
        tracing::warn!(error = %e, "report prompt unavailable; no narrative produced");
        return None;
      }
    };
    self.send("executive report", request).await
  }

  async fn send(&self, kind: &'static str, request: CompletionRequest) -> Option<String> {
    match self.client.complete(request).await {
      Ok(text) => Some(text),
      Err(e) => {
        tracing::warn!(error = %e, kind, "narrative service call failed; no narrative produced");
        None
      }
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

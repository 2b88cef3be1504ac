//! Completion clients: the [`CompletionClient`] seam and its OpenAI
//! chat-completions implementation.

use std::{future::Future, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, generator::NarrativeConfig};

// ─── Request ─────────────────────────────────────────────────────────────────

/// One system-instruction + user-content exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
  pub system:      String,
  pub user:        String,
  pub temperature: f32,
  pub max_tokens:  u32,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a remote text-completion service.
///
/// Tests substitute a canned implementation; production uses
/// [`OpenAiClient`].
pub trait CompletionClient: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Send `request` and return the completion text.
  fn complete(
    &self,
    request: CompletionRequest,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;
}

// ─── OpenAI ──────────────────────────────────────────────────────────────────

/// Async HTTP client for the OpenAI chat-completions endpoint.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
  client:   Client,
  api_key:  String,
  model:    String,
  endpoint: String,
}

impl OpenAiClient {
  /// Build a client from `config`. Fails with [`Error::MissingApiKey`] when no
  /// non-blank key is configured.
  pub fn new(config: &NarrativeConfig) -> Result<Self> {
    let api_key = config
      .api_key
      .as_deref()
      .map(str::trim)
      .filter(|k| !k.is_empty())
      .ok_or(Error::MissingApiKey)?
      .to_owned();

    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;

    Ok(Self {
      client,
      api_key,
      model: config.model.clone(),
      endpoint: config.endpoint.trim_end_matches('/').to_owned(),
    })
  }

  pub fn model(&self) -> &str { &self.model }

  fn url(&self) -> String { format!("{}/chat/completions", self.endpoint) }
}

impl CompletionClient for OpenAiClient {
  type Error = Error;

  async fn complete(&self, request: CompletionRequest) -> Result<String> {
    let body = ChatRequest {
      model:       &self.model,
      messages:    vec![
        ChatMessage { role: "system", content: &request.system },
        ChatMessage { role: "user", content: &request.user },
      ],
      temperature: request.temperature,
      max_tokens:  request.max_tokens,
    };

    tracing::debug!(model = %self.model, chars = request.user.len(), "sending completion request");

    let resp = self
      .client
      .post(self.url())
      .bearer_auth(&self.api_key)
      .json(&body)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Status { status: status.as_u16(), body });
    }

    let parsed: ChatResponse = resp.json().await?;
    let content = parsed
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .filter(|c| !c.trim().is_empty())
      .ok_or(Error::EmptyCompletion)?;

    tracing::debug!(model = %self.model, chars = content.len(), "completion received");
    Ok(content)
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
  model:       &'a str,
  messages:    Vec<ChatMessage<'a>>,
  temperature: f32,
  max_tokens:  u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
  role:    &'static str,
  content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
  #[serde(default)]
  choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
  message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
  content: Option<String>,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

//! In-memory fakes for the store and completion seams.

use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use tally_core::{
  batch::ResponseBatch,
  response::{NewResponse, SatisfactionResponse, ServiceQuality},
  store::ResponseStore,
};
use tally_narrative::{
  CompletionClient, CompletionRequest, NarrativeGenerator, PromptSource, PromptTemplates,
};

#[derive(Default)]
pub struct MemoryStore {
  pub rows:        Mutex<Vec<SatisfactionResponse>>,
  pub unreachable: bool,
}

impl MemoryStore {
  pub fn with_rows(n: i64) -> Self {
    let rows = (1..=n)
      .map(|id| SatisfactionResponse {
        id,
        sector: format!("Floor {id}"),
        material_missing: id % 3 == 0,
        missing_material_name: None,
        service_quality: ServiceQuality::Good,
        message: None,
        recorded_at: Utc.timestamp_opt(1_710_000_000 + id * 60, 0).unwrap(),
      })
      .collect();
    Self { rows: Mutex::new(rows), unreachable: false }
  }
}

impl ResponseStore for MemoryStore {
  async fn check_connection(&self) -> bool { !self.unreachable }

  async fn insert_response(&self, input: NewResponse) -> bool {
    if self.unreachable {
      return false;
    }
    let mut rows = self.rows.lock().unwrap();
    let id = rows.len() as i64 + 1;
    rows.push(SatisfactionResponse {
      id,
      sector: input.sector,
      material_missing: input.material_missing,
      missing_material_name: input.missing_material_name,
      service_quality: input.service_quality,
      message: input.message,
      recorded_at: Utc::now(),
    });
    true
  }

  async fn fetch_all(&self) -> ResponseBatch {
    if self.unreachable {
      return ResponseBatch::empty();
    }
    ResponseBatch::new(self.rows.lock().unwrap().clone())
  }
}

/// Replies with queued texts in order; `None` entries fail.
pub struct ScriptedClient {
  replies:  Mutex<Vec<Option<String>>>,
  pub seen: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
  pub fn new(replies: &[Option<&str>]) -> Self {
    Self {
      replies: Mutex::new(replies.iter().rev().map(|r| r.map(str::to_owned)).collect()),
      seen:    Mutex::default(),
    }
  }
}

impl CompletionClient for ScriptedClient {
  type Error = tally_narrative::Error;

  async fn complete(&self, request: CompletionRequest) -> tally_narrative::Result<String> {
    self.seen.lock().unwrap().push(request);
    self
      .replies
      .lock()
      .unwrap()
      .pop()
      .flatten()
      .ok_or(tally_narrative::Error::EmptyCompletion)
  }
}

pub fn generator(client: ScriptedClient) -> NarrativeGenerator<ScriptedClient> {
  NarrativeGenerator::new(client, PromptTemplates {
    sentiment: PromptSource::Inline("Summarise sentiment.".into()),
    report:    PromptSource::Inline("Write an executive report.".into()),
  })
}

//! Integration tests for `SqliteStore` against an on-disk database.
//!
//! Every operation opens its own connection, so `:memory:` would hand each
//! call a fresh empty database; a temporary directory is used instead.

use tally_core::{
  response::{NewResponse, ServiceQuality},
  store::ResponseStore,
};
use tempfile::TempDir;

use crate::{Error, SqliteStore};

async fn store() -> (TempDir, SqliteStore) {
  let dir = tempfile::tempdir().expect("temp dir");
  let s = SqliteStore::new(dir.path().join("tally.db"));
  s.ensure_schema().await.expect("schema");
  (dir, s)
}

fn answer(sector: &str, missing: &str, quality: &str) -> NewResponse {
  NewResponse::from_form(sector, missing, None, quality, None).unwrap()
}

// ─── Schema & connectivity ───────────────────────────────────────────────────

#[tokio::test]
async fn ensure_schema_is_idempotent() {
  let (_dir, s) = store().await;
  s.ensure_schema().await.unwrap();
  s.ensure_schema().await.unwrap();
}

#[tokio::test]
async fn check_connection_succeeds_on_valid_path() {
  let (_dir, s) = store().await;
  assert!(s.check_connection().await);
}

#[tokio::test]
async fn check_connection_fails_on_missing_directory() {
  let dir = tempfile::tempdir().unwrap();
  let s = SqliteStore::new(dir.path().join("no/such/dir/tally.db"));
  assert!(!s.check_connection().await);
}

#[tokio::test]
async fn connect_reports_connection_error() {
  let dir = tempfile::tempdir().unwrap();
  let s = SqliteStore::new(dir.path().join("missing/tally.db"));
  let err = s.connect().await.unwrap_err();
  assert!(matches!(err, Error::Connection(_)));
}

// ─── Insert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_assigns_id_and_timestamp() {
  let (_dir, s) = store().await;

  let first = s.try_insert_response(answer("Finance", "Sim", "Bom")).await.unwrap();
  let second = s.try_insert_response(answer("HR", "Não", "Ruim")).await.unwrap();

  assert!(second.id > first.id);
  assert!(second.recorded_at >= first.recorded_at);
  assert!(first.material_missing);
  assert!(!second.material_missing);
}

#[tokio::test]
async fn insert_returns_true_and_row_is_readable() {
  let (_dir, s) = store().await;

  let mut input = answer("Legal", "Sim", "Excelente");
  input.missing_material_name = Some("Paper towels".into());
  input.message = Some("Great job".into());
  assert!(s.insert_response(input).await);

  let batch = s.fetch_all().await;
  assert_eq!(batch.len(), 1);
  let r = &batch.as_slice()[0];
  assert_eq!(r.sector, "Legal");
  assert!(r.material_missing);
  assert_eq!(r.missing_material_name.as_deref(), Some("Paper towels"));
  assert_eq!(r.service_quality, ServiceQuality::Excellent);
  assert_eq!(r.message.as_deref(), Some("Great job"));
}

#[tokio::test]
async fn stored_record_matches_fetched_record() {
  let (_dir, s) = store().await;
  let stored = s.try_insert_response(answer("Ops", "", "Regular")).await.unwrap();
  let fetched = s.try_fetch_all().await.unwrap();
  assert_eq!(fetched.as_slice(), &[stored]);
}

#[tokio::test]
async fn insert_without_schema_returns_false() {
  let dir = tempfile::tempdir().unwrap();
  let s = SqliteStore::new(dir.path().join("bare.db"));
  assert!(!s.insert_response(answer("Ops", "Sim", "Bom")).await);
}

#[tokio::test]
async fn unknown_quality_label_roundtrips() {
  let (_dir, s) = store().await;
  s.try_insert_response(answer("Ops", "Sim", "Péssimo")).await.unwrap();
  let batch = s.try_fetch_all().await.unwrap();
  assert_eq!(
    batch.as_slice()[0].service_quality,
    ServiceQuality::Other("Péssimo".into())
  );
}

// ─── Fetch ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_all_is_newest_first() {
  let (_dir, s) = store().await;
  for sector in ["A", "B", "C", "D", "E"] {
    assert!(s.insert_response(answer(sector, "Não", "Bom")).await);
  }

  let batch = s.fetch_all().await;
  assert_eq!(batch.len(), 5);
  let times: Vec<_> = batch.iter().map(|r| r.recorded_at).collect();
  assert!(times.windows(2).all(|w| w[0] >= w[1]), "not descending: {times:?}");

  // Inserts may share a timestamp; the id tie-break keeps insertion order reversed.
  let sectors: Vec<_> = batch.iter().map(|r| r.sector.as_str()).collect();
  assert_eq!(sectors, ["E", "D", "C", "B", "A"]);
}

#[tokio::test]
async fn fetch_all_on_empty_table_is_empty() {
  let (_dir, s) = store().await;
  assert!(s.fetch_all().await.is_empty());
}

#[tokio::test]
async fn fetch_all_on_unreachable_store_is_empty() {
  let dir = tempfile::tempdir().unwrap();
  let s = SqliteStore::new(dir.path().join("gone/tally.db"));
  assert!(s.fetch_all().await.is_empty());
}

#[tokio::test]
async fn try_fetch_all_surfaces_missing_table() {
  let dir = tempfile::tempdir().unwrap();
  let s = SqliteStore::new(dir.path().join("bare.db"));
  let err = s.try_fetch_all().await.unwrap_err();
  assert!(matches!(err, Error::Database(_)));
}

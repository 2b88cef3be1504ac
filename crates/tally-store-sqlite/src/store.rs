//! [`SqliteStore`], the SQLite implementation of [`ResponseStore`].

use std::path::{Path, PathBuf};

use chrono::{SubsecRound as _, Utc};
use tally_core::{
  batch::ResponseBatch,
  response::{NewResponse, SatisfactionResponse},
  store::ResponseStore,
};

use crate::{
  encode::{RawResponse, encode_dt, encode_quality},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A response store backed by a single SQLite file.
///
/// Holds only the database path. Each operation opens its own connection and
/// closes it before returning, so nothing is shared between calls.
#[derive(Debug, Clone)]
pub struct SqliteStore {
  path: PathBuf,
}

impl SqliteStore {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }

  /// Open a connection to the configured database.
  ///
  /// The caller owns the handle and is responsible for closing it.
  pub async fn connect(&self) -> Result<tokio_rusqlite::Connection> {
    tokio_rusqlite::Connection::open(&self.path)
      .await
      .map_err(Error::Connection)
  }

  /// Create the response table if it does not exist yet.
  ///
  /// Meant to be called once by the composition root at startup.
  pub async fn ensure_schema(&self) -> Result<()> {
    self
      .with_connection(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::info!(path = %self.path.display(), "response table verified");
    Ok(())
  }

  /// Append one response inside a transaction and return the stored record.
  ///
  /// The transaction is rolled back if the insert or the commit fails.
  pub async fn try_insert_response(
    &self,
    input: NewResponse,
  ) -> Result<SatisfactionResponse> {
    let recorded_at = Utc::now().trunc_subsecs(6);

    let sector       = input.sector.clone();
    let missing      = input.material_missing;
    let missing_name = input.missing_material_name.clone();
    let quality_str  = encode_quality(&input.service_quality);
    let message      = input.message.clone();
    let at_str       = encode_dt(recorded_at);

    let id = self
      .with_connection(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO satisfaction_responses (
             sector, material_missing, missing_material_name,
             service_quality, message, recorded_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![sector, missing, missing_name, quality_str, message, at_str],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
      })
      .await?;

    Ok(SatisfactionResponse {
      id,
      sector: input.sector,
      material_missing: input.material_missing,
      missing_material_name: input.missing_material_name,
      service_quality: input.service_quality,
      message: input.message,
      recorded_at,
    })
  }

  /// Read every response, newest first.
  pub async fn try_fetch_all(&self) -> Result<ResponseBatch> {
    let raws: Vec<RawResponse> = self
      .with_connection(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, sector, material_missing, missing_material_name,
                  service_quality, message, recorded_at
           FROM satisfaction_responses
           ORDER BY recorded_at DESC, id DESC",
        )?;
        let rows = stmt
          .query_map([], RawResponse::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let responses = raws
      .into_iter()
      .map(RawResponse::into_response)
      .collect::<Result<Vec<_>>>()?;

    Ok(ResponseBatch::new(responses))
  }

  /// Run `f` on a fresh connection, then close it whether or not `f` failed.
  async fn with_connection<F, R>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<R> + Send + 'static,
    R: Send + 'static,
  {
    let conn = self.connect().await?;
    let result = conn.call(f).await;
    if let Err(e) = conn.close().await {
      tracing::debug!(error = %e, "closing connection failed");
    }
    Ok(result?)
  }
}

// ─── ResponseStore impl ──────────────────────────────────────────────────────

impl ResponseStore for SqliteStore {
  async fn check_connection(&self) -> bool {
    let select_one = self
      .with_connection(|conn| Ok(conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?))
      .await;
    match select_one {
      Ok(_) => true,
      Err(e) => {
        tracing::warn!(error = %e, path = %self.path.display(), "connection check failed");
        false
      }
    }
  }

  async fn insert_response(&self, input: NewResponse) -> bool {
    match self.try_insert_response(input).await {
      Ok(stored) => {
        tracing::info!(
          id = stored.id,
          sector = %stored.sector,
          quality = %stored.service_quality,
          "response saved"
        );
        true
      }
      Err(e) => {
        tracing::warn!(error = %e, "saving response failed; transaction rolled back");
        false
      }
    }
  }

  async fn fetch_all(&self) -> ResponseBatch {
    match self.try_fetch_all().await {
      Ok(batch) => {
        tracing::info!(count = batch.len(), "responses fetched");
        batch
      }
      Err(Error::Connection(e)) => {
        tracing::warn!(error = %e, path = %self.path.display(), "store unreachable; returning empty batch");
        ResponseBatch::empty()
      }
      Err(e) => {
        tracing::warn!(error = %e, "fetching responses failed; returning empty batch");
        ResponseBatch::empty()
      }
    }
  }
}

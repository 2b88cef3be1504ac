//! The `ResponseStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `tally-store-sqlite`).
//! The dashboard depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{batch::ResponseBatch, response::NewResponse};

/// Abstraction over the satisfaction-response table.
///
/// Every operation collapses failures into a sentinel: `false` for checks and
/// writes, an empty batch for reads. Implementations log the underlying cause
/// before degrading, since the sentinel alone cannot tell the kinds apart.
///
/// Responses are append-only; there is no update or delete.
pub trait ResponseStore: Send + Sync {
  /// Open a connection, run a trivial query and close it again.
  fn check_connection(&self) -> impl Future<Output = bool> + Send + '_;

  /// Append one response. The store assigns `id` and `recorded_at`.
  fn insert_response(
    &self,
    input: NewResponse,
  ) -> impl Future<Output = bool> + Send + '_;

  /// Every stored response, newest first. Empty when the store is empty or
  /// unreachable.
  fn fetch_all(&self) -> impl Future<Output = ResponseBatch> + Send + '_;
}

//! Domain types for the tally survey dashboard: survey responses, batches
//! and their statistics, and the [`store::ResponseStore`] seam.
//!
//! No I/O happens here; storage and HTTP live in the backend crates.

// Native `async fn` in traits; implementors pick their own futures.
#![allow(async_fn_in_trait)]

pub mod batch;
pub mod error;
pub mod response;
pub mod store;

pub use error::{Error, Result};

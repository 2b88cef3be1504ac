//! Narrative generation for tally.
//!
//! Wraps a remote text-completion service behind [`CompletionClient`] and
//! builds the two request shapes the dashboard needs: a sentiment summary of
//! raw responses and an executive report drafted from aggregate statistics.
//!
//! Every generation call fails closed. Transport, auth, quota and template
//! errors are logged and surface as `None`, never as a partial narrative.

#![allow(async_fn_in_trait)]

pub mod client;
pub mod error;
pub mod generator;
pub mod prompt;

pub use client::{CompletionClient, CompletionRequest, OpenAiClient};
pub use error::{Error, Result};
pub use generator::{NarrativeConfig, NarrativeGenerator, SAMPLING_CAP};
pub use prompt::{PromptSource, PromptTemplates};

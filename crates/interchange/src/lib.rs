//! valruns-interchange: typed splits document records and deserialization.
//!
//! Provides typed structs for the splits document exported by the timer
//! (segments with their per-attempt history, attempts, personal-best
//! splits) and a single `from_document()` entry point that validates a
//! `serde_json::Value` eagerly and produces a [`SplitsDocument`].
//!
//! Every consumer (the core pipeline, the CLI renderers, the dashboard
//! server) goes through this crate, so a document with missing or
//! mistyped fields is rejected before any transformation begins.

pub mod deserialize;
pub mod types;

pub use deserialize::{from_document, from_str, DocumentError};
pub use types::*;

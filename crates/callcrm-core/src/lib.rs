//! callcrm-core: call record ingestion core.
//!
//! This crate exposes the canonical record schema, the ingestion normalizer,
//! and the session store, plus the export and configuration layers.
//!
//! # Architecture
//!
//! ```text
//! manual form ──┐
//! JSON import ──┼──► Normalizer ──► Store ──► UI
//! sheet rows ───┘                     │
//!                                     └──► Export
//! ```
//!
//! Every path is a synchronous, single-pass transform; the store is owned by
//! one session and only ever appended to or cleared.

pub mod config;
pub mod error;
pub mod export;
pub mod normalizer;
pub mod store;
pub mod types;
pub mod view;

pub use error::IngestError;
pub use normalizer::{FieldIssue, IngestBatch, Row};
pub use store::{CallStore, Stats};
pub use types::{CallRecord, ManualEntry, Source};

//! Core types for callcrm-core.
//!
//! This module defines the canonical [`CallRecord`] every ingestion path
//! converges to, its [`Source`] provenance tag, and the [`ManualEntry`] shape
//! the add-call form hands to the normalizer.

use serde::{Deserialize, Serialize};

/// A canonical call record produced by the normalizer and held in the store.
///
/// Records are created exactly once and never mutated afterwards. The field
/// order matches the canonical JSON import/export shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub transcript: String,
    /// Empty string means "no recording".
    pub recording_url: String,
    pub call_summary: String,
    /// Always finite and non-negative.
    pub cost: f64,
    pub customer_number: String,
    /// ISO-8601 timestamp as supplied; not validated.
    pub started_at: String,
    /// ISO-8601 timestamp as supplied; not validated.
    pub ended_at: String,
    pub call_id: String,
    /// Ingestion time (RFC 3339, UTC). Set by the normalizer, never by the caller.
    pub added_at: String,
    pub source: Source,
}

impl CallRecord {
    /// Whether the record carries a playable recording link.
    pub fn has_recording(&self) -> bool {
        !self.recording_url.trim().is_empty()
    }
}

/// Which ingestion path produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Manual,
    JsonUpload,
    GoogleSheets,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Manual, Source::JsonUpload, Source::GoogleSheets];

    /// Prefix used when the normalizer has to generate a `call_id`.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Source::Manual => "ID",
            Source::JsonUpload => "JSON",
            Source::GoogleSheets => "SHEET",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Manual => write!(f, "manual"),
            Source::JsonUpload => write!(f, "json_upload"),
            Source::GoogleSheets => write!(f, "google_sheets"),
        }
    }
}

/// The eight fields a user types into the add-call form.
///
/// `cost` is already numeric; the form refuses to submit anything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManualEntry {
    pub transcript: String,
    pub recording_url: String,
    pub call_summary: String,
    pub cost: f64,
    pub customer_number: String,
    pub started_at: String,
    pub ended_at: String,
    pub call_id: String,
}

/// Build the generated identifier for the `seq`-th record (1-based) of a source.
pub fn generated_call_id(source: Source, seq: usize) -> String {
    format!("{}{:04}", source.id_prefix(), seq)
}

//! callcrm: a terminal call-record CRM.
//!
//! Calls come from three places: the add-call form, JSON files, and published
//! spreadsheets. All of them go through one normalizer into a session store,
//! which the TUI renders and the export layer writes back out. This crate
//! re-exports the layers so integration tests can import them directly, and
//! hosts the non-interactive [`headless`] mode.
//!
//! # Architecture
//!
//! ```text
//! manual form ──┐
//! JSON file ────┼──► Normalizer ──► Store ──► UI / headless
//! sheet (HTTP) ─┘                     │
//!                                     └──► Export
//! ```

pub mod headless;

pub use callcrm_core::{config, error, export, normalizer, store, types, view};
pub use callcrm_core::{CallRecord, CallStore, IngestBatch, IngestError, ManualEntry, Source, Stats};
pub use callcrm_feeds::{delimited, json_file, sheets, FetchError, SheetFetcher};

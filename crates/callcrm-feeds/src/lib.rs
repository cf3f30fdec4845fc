//! callcrm-feeds: ingestion source adapters for callcrm.
//!
//! Each adapter reads one kind of external input and hands it to the
//! normalizer, returning an [`IngestBatch`](callcrm_core::IngestBatch) for the
//! caller to append to its store.

pub mod cache;
pub mod delimited;
pub mod json_file;
pub mod sheets;

pub use sheets::{FetchError, SheetFetcher};

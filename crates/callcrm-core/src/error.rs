//! Batch-level ingestion errors.
//!
//! Each variant aborts the import it came from and nothing else: the store is
//! left untouched and the session carries on. Field-level problems are not
//! errors at all; see [`FieldIssue`](crate::normalizer::FieldIssue).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    /// The JSON document parsed but its top-level shape is not an array, a
    /// `{"records": [...]}` wrapper, or a single record object.
    #[error("unrecognized JSON shape: {0}")]
    Format(String),

    /// The JSON document is not syntactically valid.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The tabular source could not be retrieved or parsed.
    #[error("could not load sheet: {0}")]
    Fetch(String),

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;

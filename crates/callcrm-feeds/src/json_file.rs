//! JSON file import.

use callcrm_core::error::{IngestError, Result};
use callcrm_core::normalizer::normalize_json_str;
use callcrm_core::IngestBatch;
use std::path::Path;

/// Read `path`, parse it as one JSON document, and normalize it.
///
/// The whole file is one batch: a read failure, a syntax error, or an
/// unrecognized shape aborts it and yields no records.
pub fn load(path: &Path) -> Result<IngestBatch> {
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let batch = normalize_json_str(&text)?;
    tracing::info!(
        path = %path.display(),
        records = batch.len(),
        issues = batch.issues.len(),
        "imported JSON file"
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn file_with(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_array_file() {
        let file = file_with(r#"[{"call_id":"A1","cost":"12.50"},{"transcript":"hi"}]"#);
        let batch = load(file.path()).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.records[1].call_id, "JSON0002");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let file = file_with("{not json");
        assert!(matches!(load(file.path()), Err(IngestError::Parse(_))));
    }

    #[test]
    fn bare_string_is_format_error() {
        let file = file_with(r#""not a record""#);
        assert!(matches!(load(file.path()), Err(IngestError::Format(_))));
    }
}

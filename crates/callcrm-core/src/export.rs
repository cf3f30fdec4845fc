//! Export: renders records in the canonical JSON array shape.
//!
//! The output is accepted as-is by the JSON import path, so an export can be
//! re-imported later (with fresh `added_at` values).

use crate::error::{IngestError, Result};
use crate::types::CallRecord;
use std::path::Path;

pub fn to_json_value(records: &[CallRecord]) -> serde_json::Value {
    serde_json::Value::Array(
        records
            .iter()
            .map(|r| serde_json::to_value(r).unwrap_or(serde_json::Value::Null))
            .collect(),
    )
}

pub fn to_json_string(records: &[CallRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Write `records` to `path` as pretty-printed JSON, replacing any existing file.
pub fn write_json(path: &Path, records: &[CallRecord]) -> Result<()> {
    let body = to_json_string(records)?;
    std::fs::write(path, body).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), records = records.len(), "exported records");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Source;

    #[test]
    fn export_has_canonical_keys() {
        let rec = CallRecord {
            transcript: "t".into(),
            recording_url: String::new(),
            call_summary: "s".into(),
            cost: 2.5,
            customer_number: "+1".into(),
            started_at: String::new(),
            ended_at: String::new(),
            call_id: "ID0001".into(),
            added_at: "2024-01-15T10:00:00.000000Z".into(),
            source: Source::Manual,
        };
        let value = to_json_value(&[rec]);
        let obj = value[0].as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "added_at",
                "call_id",
                "call_summary",
                "cost",
                "customer_number",
                "ended_at",
                "recording_url",
                "source",
                "started_at",
                "transcript",
            ]
        );
        assert_eq!(obj["source"], "manual");
        assert_eq!(obj["cost"], 2.5);
    }
}

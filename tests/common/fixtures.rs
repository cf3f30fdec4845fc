//! Static import corpora used across harnesses.
//!
//! JSON fixtures cover the three accepted document shapes plus the shapes that
//! must be rejected; CSV fixtures cover canonical headers and the historical
//! column aliases a real exported sheet carries.

use std::path::{Path, PathBuf};

/// Top-level array, three records, one with a string cost and one without an id.
pub const JSON_ARRAY: &str = r#"[
  {
    "call_id": "CALL-100",
    "transcript": "Customer asked about the refund window for order 5521.",
    "recording_url": "https://recordings.example.com/100.mp3",
    "call_summary": "Refund policy question",
    "cost": 0.35,
    "customer_number": "+15550100",
    "started_at": "2024-01-15T09:00:00Z",
    "ended_at": "2024-01-15T09:04:10Z"
  },
  {
    "call_id": "CALL-101",
    "call_summary": "Wrong number",
    "cost": "0.05",
    "customer_number": "+15550101"
  },
  {
    "transcript": "Hello?",
    "cost": 1
  }
]"#;

/// `{"records": [...]}` wrapper with two records.
pub const JSON_WRAPPED: &str = r#"{
  "records": [
    { "call_id": "W-1", "cost": 2.5 },
    { "call_id": "W-2", "cost": "3.25", "transcript": "follow-up" }
  ]
}"#;

/// A single record object.
pub const JSON_SINGLE: &str = r#"{ "call_id": "ONLY", "transcript": "just one", "cost": 9 }"#;

/// Well-formed JSON in a shape the importer rejects as a whole.
pub const JSON_BAD_SHAPES: &[&str] = &[
    "42",
    r#""a string""#,
    "true",
    "null",
    r#"{"records": "nope"}"#,
    r#"[{"call_id": "ok"}, "not an object"]"#,
];

/// Header row uses the canonical field names.
pub const CSV_CANONICAL: &str = "\
call_id,transcript,recording_url,call_summary,cost,customer_number,started_at,ended_at
S-1,Short call,,Hung up,0.10,+15550200,2024-01-15T11:00:00Z,2024-01-15T11:00:30Z
S-2,Long call,https://recordings.example.com/s2.wav,Upgrade sale,1.75,+15550201,2024-01-15T12:00:00Z,2024-01-15T12:20:00Z
";

/// Header row uses the historical aliases; ids are generated and the
/// transcript falls back to the summary. CRLF line endings and a quoted
/// multi-line cell.
pub const CSV_ALIASED: &str = "phone number,call_cost,call_start_time,call_end_time,call_summary\r\n\
+15550300,2.40,2024-01-16T08:00:00Z,2024-01-16T08:03:00Z,\"Billing, then\nshipping\"\r\n\
+15550301,not-a-number,2024-01-16T09:00:00Z,2024-01-16T09:01:00Z,Voicemail\r\n";

/// Write `contents` to `dir/name` and return the path.
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}

//! Fluent builders for test inputs.
//!
//! [`CallRecordBuilder`] produces already-canonical records for store and
//! export tests; [`JsonRecordBuilder`] produces raw import objects, which may
//! be arbitrarily malformed.

use callcrm::{CallRecord, ManualEntry, Source};
use serde_json::{json, Map, Value};

pub const FIXED_ADDED_AT: &str = "2024-01-15T10:00:00.000000Z";

// ---------------------------------------------------------------------------
// CallRecordBuilder
// ---------------------------------------------------------------------------

/// Builder for canonical `CallRecord` values.
///
/// ```rust
/// let rec = CallRecordBuilder::new("ID0001").cost(2.5).source(Source::Manual).build();
/// ```
pub struct CallRecordBuilder {
    record: CallRecord,
}

impl CallRecordBuilder {
    pub fn new(call_id: impl Into<String>) -> Self {
        Self {
            record: CallRecord {
                transcript: String::new(),
                recording_url: String::new(),
                call_summary: String::new(),
                cost: 0.0,
                customer_number: String::new(),
                started_at: String::new(),
                ended_at: String::new(),
                call_id: call_id.into(),
                added_at: FIXED_ADDED_AT.to_string(),
                source: Source::Manual,
            },
        }
    }

    pub fn transcript(mut self, transcript: impl Into<String>) -> Self {
        self.record.transcript = transcript.into();
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.record.call_summary = summary.into();
        self
    }

    pub fn recording(mut self, url: impl Into<String>) -> Self {
        self.record.recording_url = url.into();
        self
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.record.cost = cost;
        self
    }

    pub fn customer(mut self, number: impl Into<String>) -> Self {
        self.record.customer_number = number.into();
        self
    }

    pub fn times(mut self, started_at: impl Into<String>, ended_at: impl Into<String>) -> Self {
        self.record.started_at = started_at.into();
        self.record.ended_at = ended_at.into();
        self
    }

    pub fn source(mut self, source: Source) -> Self {
        self.record.source = source;
        self
    }

    pub fn build(self) -> CallRecord {
        self.record
    }
}

// ---------------------------------------------------------------------------
// JsonRecordBuilder
// ---------------------------------------------------------------------------

/// Builder for one raw JSON import object. Any key, any value.
#[derive(Default)]
pub struct JsonRecordBuilder {
    fields: Map<String, Value>,
}

impl JsonRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn call_id(self, id: &str) -> Self {
        self.field("call_id", id)
    }

    pub fn cost(self, cost: impl Into<Value>) -> Self {
        self.field("cost", cost)
    }

    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// A fully populated form submission.
pub fn full_manual_entry(call_id: &str) -> ManualEntry {
    ManualEntry {
        transcript: "Agent: Thanks for calling. Customer: My invoice is wrong.".into(),
        recording_url: "https://recordings.example.com/calls/abc.mp3".into(),
        call_summary: "Invoice dispute, escalated to billing".into(),
        cost: 0.42,
        customer_number: "+15550100".into(),
        started_at: "2024-01-15T10:00:00Z".into(),
        ended_at: "2024-01-15T10:06:30Z".into(),
        call_id: call_id.into(),
    }
}

/// `n` canonical records alternating across the three sources, cost `i` cents.
pub fn build_corpus(n: usize) -> Vec<CallRecord> {
    (0..n)
        .map(|i| {
            CallRecordBuilder::new(format!("C{i:05}"))
                .transcript(format!("transcript for call {i}"))
                .cost(i as f64 / 100.0)
                .source(Source::ALL[i % Source::ALL.len()])
                .build()
        })
        .collect()
}

/// Wrap raw objects in a JSON array document.
pub fn json_array(records: impl IntoIterator<Item = Value>) -> Value {
    Value::Array(records.into_iter().collect())
}

/// Wrap raw objects in a `{"records": [...]}` document.
pub fn json_wrapped(records: impl IntoIterator<Item = Value>) -> Value {
    json!({ "records": json_array(records) })
}

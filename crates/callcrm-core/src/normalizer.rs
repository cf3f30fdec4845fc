//! Normalizer: folds raw inputs into canonical [`CallRecord`] values.
//!
//! Three paths share one mechanism: a [`FieldSpec`] table maps every canonical
//! field to the ordered source keys it accepts and the coercion applied to the
//! first key present. Coercion never fails; a value that cannot be coerced is
//! replaced by its default and reported as a [`FieldIssue`].
//!
//! | path | input | id prefix |
//! |------|-------|-----------|
//! | [`normalize_manual`] | [`ManualEntry`] | `ID` (collection size + 1) |
//! | [`normalize_json_batch`] | any `serde_json::Value` | `JSON` (position in batch + 1) |
//! | [`normalize_tabular_batch`] | header-keyed rows | `SHEET` (row in batch + 1) |

use crate::error::{IngestError, Result};
use crate::types::{generated_call_id, CallRecord, ManualEntry, Source};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Field table
// ---------------------------------------------------------------------------

/// A canonical `CallRecord` field that is read from raw input.
///
/// `added_at` and `source` are absent on purpose: the normalizer sets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Transcript,
    RecordingUrl,
    CallSummary,
    Cost,
    CustomerNumber,
    StartedAt,
    EndedAt,
    CallId,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Transcript => "transcript",
            Field::RecordingUrl => "recording_url",
            Field::CallSummary => "call_summary",
            Field::Cost => "cost",
            Field::CustomerNumber => "customer_number",
            Field::StartedAt => "started_at",
            Field::EndedAt => "ended_at",
            Field::CallId => "call_id",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Any scalar rendered as text; absent → `""`.
    Text,
    /// Finite, non-negative `f64`; absent or uncoercible → `0.0`.
    Cost,
}

/// One row of a field table: which keys feed a canonical field, in priority order.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    pub keys: &'static [&'static str],
    pub coercion: Coercion,
}

const fn spec(field: Field, keys: &'static [&'static str], coercion: Coercion) -> FieldSpec {
    FieldSpec { field, keys, coercion }
}

/// Keys accepted from JSON imports.
pub const JSON_FIELDS: &[FieldSpec] = &[
    spec(Field::Transcript, &["transcript", "call_summary"], Coercion::Text),
    spec(Field::RecordingUrl, &["recording_url"], Coercion::Text),
    spec(Field::CallSummary, &["call_summary"], Coercion::Text),
    spec(Field::Cost, &["cost"], Coercion::Cost),
    spec(Field::CustomerNumber, &["customer_number"], Coercion::Text),
    spec(Field::StartedAt, &["started_at"], Coercion::Text),
    spec(Field::EndedAt, &["ended_at"], Coercion::Text),
    spec(Field::CallId, &["call_id"], Coercion::Text),
];

/// Columns accepted from spreadsheet rows, including the historical aliases.
pub const SHEET_FIELDS: &[FieldSpec] = &[
    spec(Field::Transcript, &["transcript", "call_summary"], Coercion::Text),
    spec(Field::RecordingUrl, &["recording_url"], Coercion::Text),
    spec(Field::CallSummary, &["call_summary"], Coercion::Text),
    spec(Field::Cost, &["cost", "call_cost"], Coercion::Cost),
    spec(Field::CustomerNumber, &["customer_number", "phone number"], Coercion::Text),
    spec(Field::StartedAt, &["started_at", "call_start_time"], Coercion::Text),
    spec(Field::EndedAt, &["ended_at", "call_end_time"], Coercion::Text),
    spec(Field::CallId, &["call_id"], Coercion::Text),
];

// ---------------------------------------------------------------------------
// Raw record access
// ---------------------------------------------------------------------------

/// A borrowed raw value, before coercion.
#[derive(Debug, Clone, Copy)]
pub enum RawValue<'a> {
    Json(&'a Value),
    Cell(&'a str),
}

/// Key lookup over a raw input record.
///
/// Returning `Some` means the key is present; alias resolution stops at the
/// first present key even when its value is empty.
pub trait RawRecord {
    fn raw(&self, key: &str) -> Option<RawValue<'_>>;
}

impl RawRecord for Map<String, Value> {
    fn raw(&self, key: &str) -> Option<RawValue<'_>> {
        self.get(key).filter(|v| !v.is_null()).map(RawValue::Json)
    }
}

/// One spreadsheet row keyed by header name.
pub type Row = HashMap<String, String>;

/// Every row carries every header column, so a blank cell is the sheet's
/// `null`: it counts as absent and lets the next alias through.
impl RawRecord for Row {
    fn raw(&self, key: &str) -> Option<RawValue<'_>> {
        self.get(key)
            .filter(|v| !v.trim().is_empty())
            .map(|v| RawValue::Cell(v.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Batch output
// ---------------------------------------------------------------------------

/// A field that could not be coerced and was replaced by its default.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    /// `call_id` of the record the issue belongs to (after generation).
    pub call_id: String,
    pub field: Field,
    /// The offending raw value, rendered as text.
    pub raw: String,
    pub reason: &'static str,
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} {:?} {}, using default",
            self.call_id, self.field, self.raw, self.reason
        )
    }
}

/// Result of one import: the normalized records plus any field-level issues.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestBatch {
    pub records: Vec<CallRecord>,
    pub issues: Vec<FieldIssue>,
}

impl IngestBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Normalize one add-call form submission.
///
/// `existing` is the current size of the collection; an empty `call_id` is
/// generated as `ID` + (`existing` + 1) padded to four digits.
pub fn normalize_manual(entry: ManualEntry, existing: usize) -> CallRecord {
    normalize_manual_at(entry, existing, Utc::now())
}

/// Normalize a parsed JSON document into a batch.
///
/// Accepts a top-level array of records, a `{"records": [...]}` wrapper, or a
/// single record object. Anything else fails with [`IngestError::Format`] and
/// nothing is produced.
pub fn normalize_json_batch(doc: &Value) -> Result<IngestBatch> {
    normalize_json_batch_at(doc, Utc::now())
}

/// Parse JSON text and normalize it. Syntax errors surface as
/// [`IngestError::Parse`].
pub fn normalize_json_str(text: &str) -> Result<IngestBatch> {
    let doc: Value = serde_json::from_str(text)?;
    normalize_json_batch(&doc)
}

/// Normalize rows fetched from a spreadsheet. Never fails.
pub fn normalize_tabular_batch(rows: &[Row]) -> IngestBatch {
    normalize_tabular_batch_at(rows, Utc::now())
}

// ---------------------------------------------------------------------------
// Clock-explicit implementations
// ---------------------------------------------------------------------------

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn normalize_manual_at(entry: ManualEntry, existing: usize, now: DateTime<Utc>) -> CallRecord {
    let call_id = if entry.call_id.trim().is_empty() {
        generated_call_id(Source::Manual, existing + 1)
    } else {
        entry.call_id
    };
    // Finite and non-negative whoever the caller is.
    let cost = if entry.cost.is_finite() && entry.cost >= 0.0 { entry.cost } else { 0.0 };

    CallRecord {
        transcript: entry.transcript,
        recording_url: entry.recording_url,
        call_summary: entry.call_summary,
        cost,
        customer_number: entry.customer_number,
        started_at: entry.started_at,
        ended_at: entry.ended_at,
        call_id,
        added_at: timestamp(now),
        source: Source::Manual,
    }
}

pub(crate) fn normalize_json_batch_at(doc: &Value, now: DateTime<Utc>) -> Result<IngestBatch> {
    let items: Vec<&Value> = match doc {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => match map.get("records") {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(other) => {
                return Err(IngestError::Format(format!(
                    "\"records\" must be an array, found {}",
                    kind_of(other)
                )))
            }
            None => vec![doc],
        },
        other => {
            return Err(IngestError::Format(format!(
                "expected an array, an object with \"records\", or a record object; found {}",
                kind_of(other)
            )))
        }
    };

    // Validate the whole document before producing anything.
    let mut objects = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(map) => objects.push(map),
            other => {
                return Err(IngestError::Format(format!(
                    "record {} is {}, expected an object",
                    idx + 1,
                    kind_of(other)
                )))
            }
        }
    }

    let added_at = timestamp(now);
    let mut batch = IngestBatch::default();
    for (offset, map) in objects.into_iter().enumerate() {
        let record = build_record(map, JSON_FIELDS, Source::JsonUpload, offset, &added_at, &mut batch.issues);
        batch.records.push(record);
    }
    log_issues(Source::JsonUpload, &batch);
    Ok(batch)
}

pub(crate) fn normalize_tabular_batch_at(rows: &[Row], now: DateTime<Utc>) -> IngestBatch {
    let added_at = timestamp(now);
    let mut batch = IngestBatch::default();
    for (offset, row) in rows.iter().enumerate() {
        let record = build_record(row, SHEET_FIELDS, Source::GoogleSheets, offset, &added_at, &mut batch.issues);
        batch.records.push(record);
    }
    log_issues(Source::GoogleSheets, &batch);
    batch
}

// ---------------------------------------------------------------------------
// Record assembly
// ---------------------------------------------------------------------------

fn build_record<R: RawRecord + ?Sized>(
    raw: &R,
    table: &[FieldSpec],
    source: Source,
    offset: usize,
    added_at: &str,
    issues: &mut Vec<FieldIssue>,
) -> CallRecord {
    let mut text: HashMap<Field, String> = HashMap::new();
    let mut cost = 0.0;
    let mut cost_problem: Option<(String, &'static str)> = None;

    for spec in table {
        let value = spec.keys.iter().find_map(|key| raw.raw(key));
        match spec.coercion {
            Coercion::Text => {
                text.insert(spec.field, value.map(coerce_text).unwrap_or_default());
            }
            Coercion::Cost => match value.map(coerce_cost) {
                None => {}
                Some(Ok(v)) => cost = v,
                Some(Err(problem)) => cost_problem = Some(problem),
            },
        }
    }

    let mut take = |field: Field| text.remove(&field).unwrap_or_default();
    let call_id = match take(Field::CallId) {
        id if id.trim().is_empty() => generated_call_id(source, offset + 1),
        id => id,
    };

    if let Some((raw_value, reason)) = cost_problem {
        issues.push(FieldIssue { call_id: call_id.clone(), field: Field::Cost, raw: raw_value, reason });
    }

    CallRecord {
        transcript: take(Field::Transcript),
        recording_url: take(Field::RecordingUrl),
        call_summary: take(Field::CallSummary),
        cost,
        customer_number: take(Field::CustomerNumber),
        started_at: take(Field::StartedAt),
        ended_at: take(Field::EndedAt),
        call_id,
        added_at: added_at.to_string(),
        source,
    }
}

fn coerce_text(value: RawValue<'_>) -> String {
    match value {
        RawValue::Cell(s) => s.to_string(),
        RawValue::Json(Value::String(s)) => s.clone(),
        RawValue::Json(Value::Null) => String::new(),
        RawValue::Json(other) => other.to_string(),
    }
}

/// Coerce a raw cost. `Err` carries the raw text and the reason it was rejected.
fn coerce_cost(value: RawValue<'_>) -> std::result::Result<f64, (String, &'static str)> {
    let (raw, parsed) = match value {
        RawValue::Cell(s) => (s.to_string(), parse_number(s)),
        RawValue::Json(Value::String(s)) => (s.clone(), parse_number(s)),
        RawValue::Json(Value::Number(n)) => (n.to_string(), n.as_f64()),
        RawValue::Json(Value::Null) => return Ok(0.0),
        RawValue::Json(other) => (other.to_string(), None),
    };

    match parsed {
        None => Err((raw, "is not a number")),
        Some(v) if !v.is_finite() => Err((raw, "is not finite")),
        Some(v) if v < 0.0 => Err((raw, "is negative")),
        Some(v) => Ok(v),
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn log_issues(source: Source, batch: &IngestBatch) {
    for issue in &batch.issues {
        tracing::warn!(%source, call_id = %issue.call_id, field = %issue.field, raw = %issue.raw, "{}", issue.reason);
    }
    tracing::debug!(%source, records = batch.records.len(), issues = batch.issues.len(), "batch normalized");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

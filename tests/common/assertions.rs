//! Domain-specific assertion macros for callcrm harnesses.
//!
//! Each macro names the record it was checking in its panic message, so a
//! failure inside a batch points at the offending call.

// ---------------------------------------------------------------------------
// Record assertions
// ---------------------------------------------------------------------------

/// Assert that a `CallRecord` came from the given source.
///
/// ```rust
/// assert_source!(record, Source::JsonUpload);
/// ```
#[macro_export]
macro_rules! assert_source {
    ($record:expr, $source:expr) => {{
        let record: &callcrm::CallRecord = &$record;
        let expected: callcrm::Source = $source;
        if record.source != expected {
            panic!(
                "assert_source! failed:\n  call_id:  {:?}\n  expected: {}\n  actual:   {}",
                record.call_id, expected, record.source
            );
        }
    }};
}

/// Assert a record's cost to the cent.
#[macro_export]
macro_rules! assert_cost {
    ($record:expr, $cost:expr) => {{
        let record: &callcrm::CallRecord = &$record;
        let expected: f64 = $cost;
        if (record.cost - expected).abs() > 0.005 {
            panic!(
                "assert_cost! failed:\n  call_id:  {:?}\n  expected: {}\n  actual:   {}",
                record.call_id, expected, record.cost
            );
        }
    }};
}

/// Assert that a record's `call_id` was generated as `<prefix><4+ digits>`.
#[macro_export]
macro_rules! assert_generated_id {
    ($record:expr, $prefix:expr) => {{
        let record: &callcrm::CallRecord = &$record;
        let prefix: &str = $prefix;
        let ok = record
            .call_id
            .strip_prefix(prefix)
            .map(|digits| digits.len() >= 4 && digits.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false);
        if !ok {
            panic!(
                "assert_generated_id! failed: {:?} is not {}NNNN\n  record: {:?}",
                record.call_id, prefix, record
            );
        }
    }};
}

/// Assert that every record satisfies the canonical invariants: non-empty
/// `call_id`, finite non-negative cost, and an RFC 3339 `added_at`.
#[macro_export]
macro_rules! assert_canonical {
    ($records:expr) => {{
        for record in $records.iter() {
            let record: &callcrm::CallRecord = record;
            if record.call_id.trim().is_empty() {
                panic!("assert_canonical! failed: empty call_id\n  record: {:?}", record);
            }
            if !record.cost.is_finite() || record.cost < 0.0 {
                panic!(
                    "assert_canonical! failed: cost {} out of range\n  call_id: {:?}",
                    record.cost, record.call_id
                );
            }
            if chrono::DateTime::parse_from_rfc3339(&record.added_at).is_err() {
                panic!(
                    "assert_canonical! failed: added_at {:?} is not RFC 3339\n  call_id: {:?}",
                    record.added_at, record.call_id
                );
            }
        }
    }};
}

// ---------------------------------------------------------------------------
// Batch assertions
// ---------------------------------------------------------------------------

/// Assert the `call_id`s of a record slice, in order.
///
/// ```rust
/// assert_ids!(batch.records, ["A1", "JSON0002"]);
/// ```
#[macro_export]
macro_rules! assert_ids {
    ($records:expr, [$($id:expr),* $(,)?]) => {{
        let actual: Vec<&str> = $records.iter().map(|r| r.call_id.as_str()).collect();
        let expected: Vec<&str> = vec![$($id),*];
        if actual != expected {
            panic!(
                "assert_ids! failed:\n  expected: {:?}\n  actual:   {:?}",
                expected, actual
            );
        }
    }};
}

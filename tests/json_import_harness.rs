#![allow(unused)]
//! JSON file import harness.
//!
//! # What this covers
//!
//! - **Shapes on disk**: array, `{"records": [...]}` wrapper, and single
//!   object files each load as one batch.
//! - **All-or-nothing**: unreadable files, syntax errors, and rejected shapes
//!   produce an error and no records.
//! - **Per-field tolerance**: a bad cost in one record is reported, not fatal.
//!
//! # Running
//!
//! ```sh
//! cargo test --test json_import_harness
//! ```

mod common;
use common::*;

use callcrm::{json_file, CallStore, IngestError, Source};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case::array(JSON_ARRAY, 3)]
#[case::wrapped(JSON_WRAPPED, 2)]
#[case::single(JSON_SINGLE, 1)]
#[case::empty_array("[]", 0)]
#[case::empty_records(r#"{"records": []}"#, 0)]
fn accepted_files(#[case] contents: &str, #[case] expected: usize) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "calls.json", contents);
    let batch = json_file::load(&path).unwrap();
    assert_eq!(batch.len(), expected);
    assert_canonical!(batch.records);
    for rec in &batch.records {
        assert_source!(*rec, Source::JsonUpload);
    }
}

#[test]
fn rejected_shapes_produce_no_records() {
    let dir = tempfile::tempdir().unwrap();
    for (i, contents) in JSON_BAD_SHAPES.iter().enumerate() {
        let path = write_fixture(dir.path(), &format!("bad{i}.json"), contents);
        match json_file::load(&path) {
            Err(IngestError::Format(_)) => {}
            other => panic!("{contents}: expected Format error, got {other:?}"),
        }
    }
}

#[rstest]
#[case::truncated(r#"[{"call_id": "A1""#)]
#[case::trailing_comma(r#"[{"call_id": "A1"},]"#)]
#[case::empty_file("")]
fn syntax_errors_are_parse_errors(#[case] contents: &str) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "broken.json", contents);
    assert!(matches!(json_file::load(&path), Err(IngestError::Parse(_))));
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.json");
    let err = json_file::load(&path).unwrap_err();
    assert!(matches!(err, IngestError::Io { .. }));
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn failed_import_leaves_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_fixture(dir.path(), "good.json", JSON_ARRAY);
    let bad = write_fixture(dir.path(), "bad.json", r#"[{"call_id": "x"}, 3]"#);

    let mut store = CallStore::new();
    for path in [&good, &bad] {
        if let Ok(batch) = json_file::load(path) {
            store.extend(batch);
        }
    }
    assert_ids!(store.records(), ["CALL-100", "CALL-101", "JSON0003"]);
}

#[test]
fn bad_cost_is_reported_but_record_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let doc = json_array([
        JsonRecordBuilder::new().call_id("A").cost("12,50").build(),
        JsonRecordBuilder::new().call_id("B").cost(true).build(),
    ]);
    let path = write_fixture(dir.path(), "calls.json", &doc.to_string());
    let batch = json_file::load(&path).unwrap();
    assert_eq!(batch.len(), 2);
    assert_cost!(batch.records[0], 0.0);
    assert_eq!(batch.issues.len(), 2);
    assert_eq!(batch.issues[1].call_id, "B");
}

//! Engine Handle specifications: open, hot-swap, and the handle's own
//! invariant that at most one engine is ever live.

use crate::prelude::*;
use rlog_core::{ExecuteRequest, QueryRequest};

#[test]
fn a_fresh_handle_executes_and_queries() {
    let dir = tempfile::tempdir().unwrap();
    let handle = fresh_engine(dir.path(), "replica.db");
    handle
        .execute(&ExecuteRequest { statements: vec!["CREATE TABLE t(x INTEGER)".to_string()], timings: false })
        .unwrap();
    let rows = handle
        .query(&QueryRequest { statements: vec!["SELECT count(*) FROM t".to_string()], timings: false })
        .unwrap();
    assert_eq!(rows[0].values, vec![vec![serde_json::json!(0)]]);
}

#[test]
fn replace_from_bytes_swaps_the_live_engine() {
    let dir = tempfile::tempdir().unwrap();
    let mut handle = fresh_engine(dir.path(), "replica.db");

    let donor = build_sqlite_file(dir.path(), "donor.db", vec![
        "CREATE TABLE u(y INTEGER)".to_string(),
        "INSERT INTO u VALUES (7)".to_string(),
    ]);
    handle.replace_from_bytes(&donor).unwrap();

    let rows = handle
        .query(&QueryRequest { statements: vec!["SELECT y FROM u".to_string()], timings: false })
        .unwrap();
    assert_eq!(rows[0].values, vec![vec![serde_json::json!(7)]]);
}

#[test]
fn replace_from_file_swaps_and_removes_the_source_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut handle = fresh_engine(dir.path(), "replica.db");

    let donor_path = dir.path().join("incoming.db");
    build_sqlite_file(dir.path(), "seed.db", vec!["CREATE TABLE u(y INTEGER)".to_string()]);
    std::fs::copy(dir.path().join("seed.db"), &donor_path).unwrap();

    handle.replace_from_file(&donor_path).unwrap();
    assert!(!donor_path.exists(), "the source file is renamed into the engine path, not copied");

    let rows = handle
        .query(&QueryRequest { statements: vec!["SELECT count(*) FROM u".to_string()], timings: false })
        .unwrap();
    assert_eq!(rows[0].values, vec![vec![serde_json::json!(0)]]);
}

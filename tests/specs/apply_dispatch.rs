//! Apply Dispatcher specifications — the behavioral heart of the crate.
//!
//! These exercise `rlog_apply::apply` exactly as a consensus layer would:
//! one committed log entry's raw bytes in, a `(record, mutated, result)`
//! tuple or a fatal `Err` out.

use crate::prelude::*;
use rlog_core::{CommandRecord, ExecuteRequest, LoadChunkPayload, QueryRequest};

#[test]
fn read_only_records_never_report_a_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let mut handle = fresh_engine(dir.path(), "replica.db");
    let r = reassembler(&dir);

    for record in [
        CommandRecord::Noop,
        CommandRecord::Unknown { tag: 200 },
        CommandRecord::Query(QueryRequest { statements: vec!["SELECT 1".to_string()], timings: false }),
    ] {
        let bytes = rlog_wire::encode(&record);
        let (_, mutated, _) = rlog_apply::apply(&bytes, &mut handle, &r).unwrap();
        assert!(!mutated, "{record:?} must not report a mutation");
    }
}

#[test]
fn a_truncated_chunked_load_is_discarded_without_swapping_or_erroring_fatally() {
    let dir = tempfile::tempdir().unwrap();
    let mut handle = fresh_engine(dir.path(), "replica.db");
    handle
        .execute(&ExecuteRequest { statements: vec!["CREATE TABLE sentinel(x INTEGER)".to_string()], timings: false })
        .unwrap();
    let r = reassembler(&dir);

    // A stream whose earlier chunks were dropped by a snapshot truncation:
    // only the tail of a real engine file arrives, under a fresh stream id.
    let whole = build_sqlite_file(dir.path(), "donor.db", vec!["CREATE TABLE u(y INTEGER)".to_string()]);
    let tail = whole[whole.len() / 2..].to_vec();

    let bytes = rlog_wire::encode(&CommandRecord::LoadChunk(LoadChunkPayload {
        stream_id: "truncated".to_string(),
        sequence_num: 12,
        is_last: true,
        abort: false,
        data: tail,
    }));
    let (_, mutated, result) = rlog_apply::apply(&bytes, &mut handle, &r).unwrap();

    assert!(mutated);
    assert_eq!(result.error(), Some("invalid chunked database file - ignoring"));

    // Proof the swap never happened: the sentinel table from before is still there.
    let rows = handle
        .query(&QueryRequest { statements: vec!["SELECT count(*) FROM sentinel".to_string()], timings: false })
        .unwrap();
    assert_eq!(rows[0].values, vec![vec![serde_json::json!(0)]]);
}

#[test]
fn a_complete_chunked_load_does_swap() {
    let dir = tempfile::tempdir().unwrap();
    let mut handle = fresh_engine(dir.path(), "replica.db");
    let r = reassembler(&dir);

    let whole = build_sqlite_file(dir.path(), "donor.db", vec![
        "CREATE TABLE u(y INTEGER)".to_string(),
        "INSERT INTO u VALUES (9)".to_string(),
    ]);
    let mid = whole.len() / 2;

    for (seq, (chunk, is_last)) in
        [(whole[..mid].to_vec(), false), (whole[mid..].to_vec(), true)].into_iter().enumerate()
    {
        let bytes = rlog_wire::encode(&CommandRecord::LoadChunk(LoadChunkPayload {
            stream_id: "full".to_string(),
            sequence_num: seq as u64,
            is_last,
            abort: false,
            data: chunk,
        }));
        let (_, mutated, result) = rlog_apply::apply(&bytes, &mut handle, &r).unwrap();
        assert!(mutated);
        assert_eq!(result.error(), None);
    }

    let rows = handle
        .query(&QueryRequest { statements: vec!["SELECT y FROM u".to_string()], timings: false })
        .unwrap();
    assert_eq!(rows[0].values, vec![vec![serde_json::json!(9)]]);
}

#[test]
fn a_malformed_record_is_fatal_not_folded_into_a_result() {
    let dir = tempfile::tempdir().unwrap();
    let mut handle = fresh_engine(dir.path(), "replica.db");
    let r = reassembler(&dir);

    assert!(rlog_apply::apply(&[0u8; 2], &mut handle, &r).is_err());
}

//! Chunk Reassembler specifications: session lifecycle and TTL eviction.

use std::sync::Arc;

use rlog_chunk::{Reassembler, ReassemblerConfig};
use rlog_core::FakeClock;

#[test]
fn a_stream_accumulates_bytes_across_chunks_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(FakeClock::new(chrono::Utc::now()));
    let r = Reassembler::new(
        ReassemblerConfig { temp_dir: dir.path().to_path_buf(), session_ttl: chrono::Duration::minutes(5) },
        clock,
    );

    r.write("s", 0, b"hello ").unwrap();
    r.write("s", 1, b"world").unwrap();
    let path = r.close("s").unwrap();
    r.delete("s");

    assert_eq!(std::fs::read(&path).unwrap(), b"hello world");
}

#[test]
fn expired_sessions_are_swept_and_their_temp_files_removed() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(FakeClock::new(chrono::Utc::now()));
    let r = Reassembler::new(
        ReassemblerConfig { temp_dir: dir.path().to_path_buf(), session_ttl: chrono::Duration::minutes(5) },
        clock.clone(),
    );

    r.write("abandoned", 0, b"partial").unwrap();
    clock.advance(chrono::Duration::minutes(10));

    let removed = r.sweep_expired();
    assert_eq!(removed.len(), 1);
    assert!(!removed[0].exists());
}

//! Shared helpers for the behavioral specifications below.
//!
//! Unlike a CLI's black-box specs, these drive the crates directly:
//! there is no subprocess boundary here, just the public API a
//! consensus layer would call.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::sync::Arc;

use rlog_chunk::{Reassembler, ReassemblerConfig};
use rlog_core::{ExecuteRequest, SystemClock};
use rlog_engine::{EngineHandle, EngineOptions, SqliteEngine};

pub fn fresh_engine(dir: &std::path::Path, name: &str) -> EngineHandle<SqliteEngine> {
    EngineHandle::open(&dir.join(name), EngineOptions::default()).expect("open engine")
}

pub fn reassembler(dir: &tempfile::TempDir) -> Reassembler {
    Reassembler::new(
        ReassemblerConfig { temp_dir: dir.path().to_path_buf(), session_ttl: chrono::Duration::minutes(5) },
        Arc::new(SystemClock),
    )
}

/// Builds a standalone, valid sqlite file at `name` under `dir`, containing
/// whatever `statements` leave behind, and returns its raw bytes.
pub fn build_sqlite_file(dir: &std::path::Path, name: &str, statements: Vec<String>) -> Vec<u8> {
    let donor = fresh_engine(dir, name);
    donor.execute(&ExecuteRequest { statements, timings: false }).expect("seed donor file");
    drop(donor);
    std::fs::read(dir.join(name)).expect("read donor file bytes")
}

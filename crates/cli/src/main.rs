// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! rlog-replay - offline diagnostic: replay a recorded log against an engine file.
//!
//! Reads consecutive 4-byte-length-prefixed command records from a flat
//! file, applies each in order against a fresh engine, and prints one
//! line of JSON per record. Not part of the replicated interface itself
//! — a tool for reproducing a divergence offline.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rlog_chunk::{Reassembler, ReassemblerConfig};
use rlog_engine::{EngineHandle, EngineOptions, SqliteEngine};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "rlog-replay",
    about = "Replay a file of recorded command records against an engine"
)]
struct Cli {
    /// Path to a file of 4-byte-length-prefixed command records
    records_file: PathBuf,

    /// Path the engine is opened at (created fresh if absent)
    engine_path: PathBuf,
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let mut handle: EngineHandle<SqliteEngine> =
        EngineHandle::open(&cli.engine_path, EngineOptions::default())
            .context("opening engine at the given path")?;
    let reassembler = Reassembler::new(ReassemblerConfig::default(), std::sync::Arc::new(rlog_core::SystemClock));

    let file = File::open(&cli.records_file).context("opening records file")?;
    let mut reader = BufReader::new(file);

    let mut seq: u64 = 0;
    loop {
        let record_bytes = match read_length_prefixed(&mut reader)? {
            Some(bytes) => bytes,
            None => break,
        };

        let summary = match rlog_apply::apply(&record_bytes, &mut handle, &reassembler) {
            Ok((record, mutated, result)) => serde_json::json!({
                "seq": seq,
                "kind": record.kind_name(),
                "mutated": mutated,
                "error": result.error(),
            }),
            Err(err) => {
                println!(
                    "{}",
                    serde_json::json!({ "seq": seq, "kind": "fatal", "mutated": false, "error": err.to_string() })
                );
                anyhow::bail!("stopping replay: {err}");
            }
        };
        println!("{summary}");
        seq += 1;
    }

    Ok(())
}

/// Reads one `<len: u32 BE><bytes>` record. Returns `None` at a clean EOF
/// before any bytes of the next record have been read.
fn read_length_prefixed(reader: &mut impl Read) -> Result<Option<Vec<u8>>> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err).context("reading record length prefix"),
    }
    let len = u32::from_be_bytes(len_buf) as usize;
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).context("reading record body")?;
    Ok(Some(body))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

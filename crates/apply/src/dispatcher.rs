// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use rlog_chunk::Reassembler;
use rlog_core::{
    is_mixed_mutated, ApplyResult, CommandRecord, LoadChunkPayload, QUERY_UNHANDLED_ERROR,
};
use rlog_engine::{EngineHandle, SqlEngine};
use tracing::{error, info, warn};

use crate::error::FatalError;

/// Decodes and applies one committed log entry.
///
/// `Err` is returned only for the fatal, decode-level integrity
/// violation described in spec section 7; every other failure mode
/// (engine errors, chunk errors, a failed swap) flows back inside the
/// `Ok` tuple's result object so the caller can log it and, for a
/// failed swap, decide to shut the replica down via
/// [`rlog_engine::EngineError::requires_shutdown`].
pub fn apply<E: SqlEngine>(
    bytes: &[u8],
    handle: &mut EngineHandle<E>,
    reassembler: &Reassembler,
) -> Result<(CommandRecord, bool, ApplyResult), FatalError> {
    let record = rlog_wire::decode(bytes)?;
    let (mutated, result) = dispatch(&record, handle, reassembler);
    info!(
        kind = record.kind_name(),
        mutated,
        error = result.error(),
        "applied log entry"
    );
    Ok((record, mutated, result))
}

fn dispatch<E: SqlEngine>(
    record: &CommandRecord,
    handle: &mut EngineHandle<E>,
    reassembler: &Reassembler,
) -> (bool, ApplyResult) {
    match record {
        CommandRecord::Query(req) => match handle.query(req) {
            Ok(rows) => (false, ApplyResult::QueryResponse { rows, error: None }),
            Err(err) => {
                (false, ApplyResult::QueryResponse { rows: vec![], error: Some(err.to_string()) })
            }
        },
        CommandRecord::Execute(req) => match handle.execute(req) {
            Ok(results) => {
                let mutated = results.iter().any(|r| r.mutated());
                (mutated, ApplyResult::ExecuteResponse { results, error: None })
            }
            Err(err) => (
                false,
                ApplyResult::ExecuteResponse { results: vec![], error: Some(err.to_string()) },
            ),
        },
        CommandRecord::ExecuteQuery(req) => match handle.request(req) {
            Ok(items) => {
                let mutated = is_mixed_mutated(&items);
                (mutated, ApplyResult::MixedResponse { results: items, error: None })
            }
            Err(err) => (
                false,
                ApplyResult::MixedResponse { results: vec![], error: Some(err.to_string()) },
            ),
        },
        CommandRecord::Load(payload) => match handle.replace_from_bytes(&payload.data) {
            Ok(()) => (true, ApplyResult::GenericResponse { error: None }),
            Err(err) => {
                error!(error = %err, "load failed to swap engine");
                (true, ApplyResult::GenericResponse { error: Some(err.to_string()) })
            }
        },
        CommandRecord::LoadChunk(payload) => handle_load_chunk(payload, handle, reassembler),
        CommandRecord::Noop => (false, ApplyResult::GenericResponse { error: None }),
        CommandRecord::Unknown { tag } => {
            warn!(tag, "unrecognized record tag");
            (false, ApplyResult::GenericResponse { error: Some(QUERY_UNHANDLED_ERROR.to_string()) })
        }
    }
}

/// Handles one `LoadChunk` record: abort, mid-stream append, or
/// stream completion. Completion is where spec section 4.4's critical
/// edge case lives — the reassembled file is validated before swap,
/// and a failed validation is a silent skip, not an error that
/// propagates past this record.
fn handle_load_chunk<E: SqlEngine>(
    payload: &LoadChunkPayload,
    handle: &mut EngineHandle<E>,
    reassembler: &Reassembler,
) -> (bool, ApplyResult) {
    if payload.abort {
        return match reassembler.abort(&payload.stream_id) {
            Ok(()) => (true, ApplyResult::GenericResponse { error: None }),
            Err(err) => (true, ApplyResult::GenericResponse { error: Some(err.to_string()) }),
        };
    }

    if let Err(err) = reassembler.write(&payload.stream_id, payload.sequence_num, &payload.data) {
        return (true, ApplyResult::GenericResponse { error: Some(err.to_string()) });
    }
    if !payload.is_last {
        return (true, ApplyResult::GenericResponse { error: None });
    }

    // Completion: close dechunker -> delete stream entry -> validate file
    // -> (swap, which itself closes the engine, removes its files,
    // renames the temp file in, and opens+publishes the new one).
    let tmp_path = match reassembler.close(&payload.stream_id) {
        Ok(path) => path,
        Err(err) => return (true, ApplyResult::GenericResponse { error: Some(err.to_string()) }),
    };
    reassembler.delete(&payload.stream_id);

    if !E::is_valid_file(&tmp_path) {
        warn!(
            stream_id = %payload.stream_id,
            "reassembled file failed validation (likely a snapshot-truncated stream); discarding without swap"
        );
        if let Err(err) = std::fs::remove_file(&tmp_path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(error = %err, "failed to remove invalid reassembled file");
            }
        }
        return (
            true,
            ApplyResult::GenericResponse {
                error: Some("invalid chunked database file - ignoring".to_string()),
            },
        );
    }

    match handle.replace_from_file(&tmp_path) {
        Ok(()) => (true, ApplyResult::GenericResponse { error: None }),
        Err(err) => {
            error!(error = %err, "chunked load failed to swap engine");
            (true, ApplyResult::GenericResponse { error: Some(err.to_string()) })
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;

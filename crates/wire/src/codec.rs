// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use rlog_core::{CommandRecord, ExecuteRequest, QueryRequest};

use crate::envelope::{decode_envelope, encode_envelope, RecordKind};
use crate::error::DecodeError;
use crate::load::{decode_load, decode_load_chunk, encode_load, encode_load_chunk};

/// Decodes one log-entry byte slice into a typed [`CommandRecord`].
///
/// Per spec section 4.1: a failure here (outer envelope or sub-command)
/// is fatal. Callers must not treat `Err` as recoverable.
pub fn decode(bytes: &[u8]) -> Result<CommandRecord, DecodeError> {
    let envelope = decode_envelope(bytes)?;
    match envelope.kind {
        Some(RecordKind::Query) => {
            let req: QueryRequest = bincode::deserialize(&envelope.sub_command)?;
            Ok(CommandRecord::Query(req))
        }
        Some(RecordKind::Execute) => {
            let req: ExecuteRequest = bincode::deserialize(&envelope.sub_command)?;
            Ok(CommandRecord::Execute(req))
        }
        Some(RecordKind::ExecuteQuery) => {
            let req: ExecuteRequest = bincode::deserialize(&envelope.sub_command)?;
            Ok(CommandRecord::ExecuteQuery(req))
        }
        Some(RecordKind::Load) => Ok(CommandRecord::Load(decode_load(envelope.sub_command)?)),
        Some(RecordKind::LoadChunk) => {
            Ok(CommandRecord::LoadChunk(decode_load_chunk(envelope.sub_command)?))
        }
        Some(RecordKind::Noop) => Ok(CommandRecord::Noop),
        None => Ok(CommandRecord::Unknown { tag: envelope.tag }),
    }
}

/// Encodes a [`CommandRecord`] back into its wire representation.
///
/// Used by the round-trip property test (spec section 8) and by the
/// replay tool to build fixture files.
pub fn encode(record: &CommandRecord) -> Vec<u8> {
    match record {
        CommandRecord::Query(req) => {
            let sub = bincode::serialize(req).unwrap_or_default();
            encode_envelope(RecordKind::Query as u8, &sub)
        }
        CommandRecord::Execute(req) => {
            let sub = bincode::serialize(req).unwrap_or_default();
            encode_envelope(RecordKind::Execute as u8, &sub)
        }
        CommandRecord::ExecuteQuery(req) => {
            let sub = bincode::serialize(req).unwrap_or_default();
            encode_envelope(RecordKind::ExecuteQuery as u8, &sub)
        }
        CommandRecord::Load(payload) => {
            encode_envelope(RecordKind::Load as u8, &encode_load(payload))
        }
        CommandRecord::LoadChunk(payload) => {
            encode_envelope(RecordKind::LoadChunk as u8, &encode_load_chunk(payload))
        }
        CommandRecord::Noop => encode_envelope(RecordKind::Noop as u8, &[]),
        CommandRecord::Unknown { tag } => encode_envelope(*tag, &[]),
    }
}

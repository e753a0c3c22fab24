// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fast-path decoders for `Load` and `LoadChunk` sub-commands.
//!
//! These bypass the generic bincode sub-command framing used by
//! `Query`/`Execute`/`ExecuteQuery` so the (potentially large) raw file
//! payload is moved rather than copied through an intermediate
//! deserializer.

use rlog_core::{LoadChunkPayload, LoadPayload};

use crate::error::DecodeError;

const LOAD_CHUNK_HEADER_MIN: usize = 2 + 8 + 1;
const FLAG_IS_LAST: u8 = 0b01;
const FLAG_ABORT: u8 = 0b10;

/// A `Load` sub-command is just the raw file bytes; no header at all.
pub fn decode_load(sub: Vec<u8>) -> Result<LoadPayload, DecodeError> {
    Ok(LoadPayload { data: sub })
}

pub fn encode_load(payload: &LoadPayload) -> Vec<u8> {
    payload.data.clone()
}

/// Layout: `stream_id_len(2, BE) | stream_id | sequence_num(8, BE) | flags(1) | data`.
pub fn decode_load_chunk(mut sub: Vec<u8>) -> Result<LoadChunkPayload, DecodeError> {
    if sub.len() < 2 {
        return Err(DecodeError::LoadChunk("missing stream_id length".to_string()));
    }
    let stream_id_len = u16::from_be_bytes([sub[0], sub[1]]) as usize;
    let header_len = 2 + stream_id_len + 8 + 1;
    if sub.len() < header_len {
        return Err(DecodeError::LoadChunk(format!(
            "truncated header: need {header_len} bytes, have {}",
            sub.len()
        )));
    }

    let stream_id = String::from_utf8(sub[2..2 + stream_id_len].to_vec())
        .map_err(|e| DecodeError::LoadChunk(format!("stream_id is not valid utf-8: {e}")))?;

    let seq_offset = 2 + stream_id_len;
    let sequence_num = u64::from_be_bytes(
        sub[seq_offset..seq_offset + 8]
            .try_into()
            .map_err(|_| DecodeError::LoadChunk("malformed sequence_num".to_string()))?,
    );
    let flags = sub[seq_offset + 8];

    // Drain everything up to the data offset, then take the remainder
    // without copying it a second time.
    let data = sub.split_off(header_len);

    Ok(LoadChunkPayload {
        stream_id,
        sequence_num,
        is_last: flags & FLAG_IS_LAST != 0,
        abort: flags & FLAG_ABORT != 0,
        data,
    })
}

pub fn encode_load_chunk(payload: &LoadChunkPayload) -> Vec<u8> {
    let mut out = Vec::with_capacity(LOAD_CHUNK_HEADER_MIN + payload.stream_id.len() + payload.data.len());
    out.extend_from_slice(&(payload.stream_id.len() as u16).to_be_bytes());
    out.extend_from_slice(payload.stream_id.as_bytes());
    out.extend_from_slice(&payload.sequence_num.to_be_bytes());
    let mut flags = 0u8;
    if payload.is_last {
        flags |= FLAG_IS_LAST;
    }
    if payload.abort {
        flags |= FLAG_ABORT;
    }
    out.push(flags);
    out.extend_from_slice(&payload.data);
    out
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The command record tagged union decoded from a replicated log entry.
//!
//! A record's `type` tag plus its `sub_command` bytes is a discriminated
//! union; see `rlog-wire` for the byte-level envelope this is decoded
//! from. This module only carries the decoded shape, not the decoding
//! logic, so that `rlog-apply` can depend on it without depending on the
//! wire format.

use serde::{Deserialize, Serialize};

/// A read-only SQL batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub statements: Vec<String>,
    #[serde(default)]
    pub timings: bool,
}

/// A write SQL batch. Same shape as `QueryRequest`; kept distinct because
/// the dispatch path differs (forwarded to the engine's write path).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub statements: Vec<String>,
    #[serde(default)]
    pub timings: bool,
}

/// A complete engine file image embedded in a single record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadPayload {
    pub data: Vec<u8>,
}

/// One chunk of a multi-record engine file stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadChunkPayload {
    pub stream_id: String,
    pub sequence_num: u64,
    #[serde(default)]
    pub is_last: bool,
    #[serde(default)]
    pub abort: bool,
    #[serde(default)]
    pub data: Vec<u8>,
}

/// A decoded log entry, ready for dispatch.
///
/// `Unknown` carries the raw tag byte so logging can report which
/// unrecognized kind was seen without aborting the replica.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommandRecord {
    #[serde(rename = "query")]
    Query(QueryRequest),
    #[serde(rename = "execute")]
    Execute(ExecuteRequest),
    #[serde(rename = "execute_query")]
    ExecuteQuery(ExecuteRequest),
    #[serde(rename = "load")]
    Load(LoadPayload),
    #[serde(rename = "load_chunk")]
    LoadChunk(LoadChunkPayload),
    #[serde(rename = "noop")]
    Noop,
    #[serde(rename = "unknown")]
    Unknown { tag: u8 },
}

impl CommandRecord {
    /// Short name used in log lines; stable across versions.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Query(_) => "query",
            Self::Execute(_) => "execute",
            Self::ExecuteQuery(_) => "execute_query",
            Self::Load(_) => "load",
            Self::LoadChunk(_) => "load_chunk",
            Self::Noop => "noop",
            Self::Unknown { .. } => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[yare::parameterized(
        query = { CommandRecord::Query(QueryRequest { statements: vec![], timings: false }), "query" },
        execute = { CommandRecord::Execute(ExecuteRequest { statements: vec![], timings: false }), "execute" },
        execute_query = { CommandRecord::ExecuteQuery(ExecuteRequest { statements: vec![], timings: false }), "execute_query" },
        load = { CommandRecord::Load(LoadPayload { data: vec![] }), "load" },
        load_chunk = { CommandRecord::LoadChunk(LoadChunkPayload {
            stream_id: String::new(), sequence_num: 0, is_last: false, abort: false, data: vec![],
        }), "load_chunk" },
        noop = { CommandRecord::Noop, "noop" },
        unknown = { CommandRecord::Unknown { tag: 9 }, "unknown" },
    )]
    fn kind_name_covers_every_variant(record: CommandRecord, expected: &str) {
        assert_eq!(record.kind_name(), expected);
    }
}

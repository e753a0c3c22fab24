// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result shapes returned by `apply`, plus the mutation predicates
//! defined in terms of them.

use serde::{Deserialize, Serialize};

/// Error text used for the `Unknown` command kind, per the per-kind
/// semantics table: unrecognized tags are not mutating but still report
/// an error so the consensus layer can log it.
pub const QUERY_UNHANDLED_ERROR: &str = "unhandled";

/// The full row-set produced by one `SELECT`-like statement. One of
/// these is returned per statement, mirroring how `ExecuteResult` is
/// returned one-per-statement on the write side.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rows {
    pub columns: Vec<String>,
    pub values: Vec<Vec<serde_json::Value>>,
    #[serde(default)]
    pub time: f64,
}

/// The outcome of one write statement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExecuteResult {
    #[serde(default)]
    pub last_insert_id: i64,
    #[serde(default)]
    pub rows_affected: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub time: f64,
}

impl ExecuteResult {
    pub fn mutated(&self) -> bool {
        self.rows_affected > 0
    }
}

/// One element of a mixed (`ExecuteQuery`) batch result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum MixedResultItem {
    #[serde(rename = "rows")]
    Rows(Rows),
    #[serde(rename = "execute")]
    Execute(ExecuteResult),
    #[serde(rename = "error")]
    Error(String),
}

/// Mutation is defined as "any element is an `Execute` result with
/// `rows_affected > 0`" (spec section 3, Mixed Result).
pub fn is_mixed_mutated(items: &[MixedResultItem]) -> bool {
    items.iter().any(|item| matches!(item, MixedResultItem::Execute(r) if r.mutated()))
}

/// The top-level shape `apply` hands back to the consensus layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ApplyResult {
    #[serde(rename = "query")]
    QueryResponse {
        rows: Vec<Rows>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    #[serde(rename = "execute")]
    ExecuteResponse {
        results: Vec<ExecuteResult>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    #[serde(rename = "mixed")]
    MixedResponse {
        results: Vec<MixedResultItem>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    #[serde(rename = "generic")]
    GenericResponse {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl ApplyResult {
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::QueryResponse { error, .. }
            | Self::ExecuteResponse { error, .. }
            | Self::MixedResponse { error, .. }
            | Self::GenericResponse { error } => error.as_deref(),
        }
    }
}

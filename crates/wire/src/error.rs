// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// A decode failure on the outer envelope or a sub-command payload.
///
/// Every variant of this error is an `IntegrityFatal` condition (spec
/// section 7): every replica sees identical bytes, so a decode error
/// here implies a code-version mismatch rather than transient
/// corruption. `rlog-apply` converts any `DecodeError` it sees into its
/// own fatal sentinel rather than attempting to recover.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("envelope truncated: need at least {need} bytes, have {have}")]
    Truncated { need: usize, have: usize },

    #[error("sub_command length mismatch: header declared {declared}, found {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("failed to decompress sub_command: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("failed to decode sub_command payload: {0}")]
    SubCommand(#[from] bincode::Error),

    #[error("load_chunk sub_command malformed: {0}")]
    LoadChunk(String),
}

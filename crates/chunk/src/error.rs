// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Chunk reassembly errors. Per spec section 7, these are all
/// recoverable: the dispatcher surfaces them in the result object and
/// continues.
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("io error reassembling stream {stream_id}: {source}")]
    Io { stream_id: String, #[source] source: std::io::Error },

    #[error("no in-progress session for stream {0}")]
    UnknownStream(String),

    #[error("out-of-order chunk for stream {stream_id}: expected sequence_num {expected}, got {got}")]
    OutOfOrder { stream_id: String, expected: u64, got: u64 },
}

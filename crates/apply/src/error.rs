// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// The only error class `apply` returns as an `Err` rather than folding
/// into its result object (spec section 7: IntegrityFatal). A decode
/// failure on the outer envelope or a sub-command means this replica's
/// bytes disagree with what produced them; continuing would diverge
/// from peers, so the caller must terminate the replica rather than
/// call `apply` again.
#[derive(Debug, Error)]
#[error("integrity violation decoding log entry: {0}")]
pub struct FatalError(#[from] pub rlog_wire::DecodeError);

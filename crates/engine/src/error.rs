// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors surfaced by the engine handle.
///
/// `SwapFailed` is the one variant the apply dispatcher treats specially
/// (spec section 7): it marks the handle as unusable, and
/// [`EngineError::requires_shutdown`] lets a caller detect that without
/// matching on the error message.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("sql error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("engine handle replacement failed: {reason}")]
    SwapFailed { reason: String },
}

impl EngineError {
    /// `true` for the one class of error that leaves the handle in an
    /// indeterminate, unusable state. The consensus layer must shut the
    /// replica down rather than continue applying.
    pub fn requires_shutdown(&self) -> bool {
        matches!(self, Self::SwapFailed { .. })
    }
}

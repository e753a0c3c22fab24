// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use rlog_core::{ExecuteRequest, ExecuteResult, MixedResultItem, QueryRequest, Rows};
use tracing::{info, warn};

use crate::error::EngineError;

/// Engine-wide configuration carried by the handle and reapplied to
/// every engine opened during a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub foreign_keys: bool,
    pub wal_mode: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { foreign_keys: true, wal_mode: true }
    }
}

/// The narrow interface the apply dispatcher depends on. The SQL engine
/// itself is otherwise opaque: its query planner, its storage format,
/// its transaction semantics are none of this crate's business.
pub trait SqlEngine: Sized {
    fn open(path: &Path, options: &EngineOptions) -> Result<Self, EngineError>;

    /// Writes `data` to `path` and opens it. Used by `Load` and by the
    /// swap protocol's bytes-based replacement path.
    fn create_on_disk(data: &[u8], path: &Path, options: &EngineOptions) -> Result<Self, EngineError>;

    fn query(&self, req: &QueryRequest) -> Result<Vec<Rows>, EngineError>;
    fn execute(&self, req: &ExecuteRequest) -> Result<Vec<ExecuteResult>, EngineError>;
    fn request(&self, req: &ExecuteRequest) -> Result<Vec<MixedResultItem>, EngineError>;

    /// Consumes `self`. On failure the engine is handed back so the
    /// caller can decide what to do with a connection that refused to
    /// close (mirrors `rusqlite::Connection::close`).
    fn close(self) -> Result<(), (Self, EngineError)>;

    fn path(&self) -> &Path;
    fn fk_enabled(&self) -> bool;
    fn wal_enabled(&self) -> bool;

    /// Format probe used both to validate a reassembled chunked-load
    /// file before swap, and generally to sanity-check `Load` payloads.
    fn is_valid_file(path: &Path) -> bool;

    /// Removes the main file plus any sidecar files the engine
    /// maintains (journal/WAL/SHM). Idempotent: a missing file is not
    /// an error.
    fn remove_files(path: &Path) -> Result<(), EngineError>;
}

/// The replica's single live engine, plus enough state to reopen one
/// after a swap even though the old connection is gone.
pub struct EngineHandle<E: SqlEngine> {
    inner: Option<E>,
    path: PathBuf,
    options: EngineOptions,
}

impl<E: SqlEngine> EngineHandle<E> {
    pub fn open(path: impl Into<PathBuf>, options: EngineOptions) -> Result<Self, EngineError> {
        let path = path.into();
        let inner = E::open(&path, &options)?;
        Ok(Self { inner: Some(inner), path, options })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn fk_enabled(&self) -> bool {
        self.options.foreign_keys
    }

    pub fn wal_enabled(&self) -> bool {
        self.options.wal_mode
    }

    /// `false` once a swap has failed partway through; every subsequent
    /// call to `query`/`execute`/`request` returns `SwapFailed` rather
    /// than panicking on an absent engine.
    pub fn is_usable(&self) -> bool {
        self.inner.is_some()
    }

    fn engine(&self) -> Result<&E, EngineError> {
        self.inner.as_ref().ok_or_else(|| EngineError::SwapFailed {
            reason: "engine handle is unusable after a failed swap".to_string(),
        })
    }

    pub fn query(&self, req: &QueryRequest) -> Result<Vec<Rows>, EngineError> {
        self.engine()?.query(req)
    }

    pub fn execute(&self, req: &ExecuteRequest) -> Result<Vec<ExecuteResult>, EngineError> {
        self.engine()?.execute(req)
    }

    pub fn request(&self, req: &ExecuteRequest) -> Result<Vec<MixedResultItem>, EngineError> {
        self.engine()?.request(req)
    }

    /// Step 1 of the replacement protocol, shared by both swap
    /// primitives: close the live engine, leaving `self` untouched on
    /// failure.
    fn close_current(&mut self) -> Result<(), EngineError> {
        let current = self.inner.take().ok_or_else(|| EngineError::SwapFailed {
            reason: "no live engine to close".to_string(),
        })?;
        match current.close() {
            Ok(()) => Ok(()),
            Err((restored, err)) => {
                self.inner = Some(restored);
                warn!(error = %err, "engine close failed during swap; handle left untouched");
                Err(EngineError::SwapFailed { reason: err.to_string() })
            }
        }
    }

    /// Replaces the live engine by renaming an already-materialized file
    /// at `tmp_path` into place. Used by the chunked-load completion
    /// path.
    pub fn replace_from_file(&mut self, tmp_path: &Path) -> Result<(), EngineError> {
        self.close_current()?;
        E::remove_files(&self.path)
            .map_err(|err| EngineError::SwapFailed { reason: format!("remove_files: {err}") })?;
        std::fs::rename(tmp_path, &self.path).map_err(|err| EngineError::SwapFailed {
            reason: format!("rename {} -> {}: {err}", tmp_path.display(), self.path.display()),
        })?;
        let reopened = E::open(&self.path, &self.options)
            .map_err(|err| EngineError::SwapFailed { reason: format!("reopen: {err}") })?;
        self.inner = Some(reopened);
        info!(path = %self.path.display(), "engine handle swapped from reassembled file");
        Ok(())
    }

    /// Replaces the live engine by materializing `data` directly at the
    /// handle's path. Used by the whole-file `Load` path.
    pub fn replace_from_bytes(&mut self, data: &[u8]) -> Result<(), EngineError> {
        self.close_current()?;
        E::remove_files(&self.path)
            .map_err(|err| EngineError::SwapFailed { reason: format!("remove_files: {err}") })?;
        let reopened = E::create_on_disk(data, &self.path, &self.options)
            .map_err(|err| EngineError::SwapFailed { reason: format!("create_on_disk: {err}") })?;
        self.inner = Some(reopened);
        info!(path = %self.path.display(), "engine handle swapped from in-memory load");
        Ok(())
    }
}

#[cfg(test)]
#[path = "handle_tests.rs"]
mod tests;

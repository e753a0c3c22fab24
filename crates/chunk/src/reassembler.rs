// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rlog_core::Clock;
use tracing::warn;
use uuid::Uuid;

use crate::error::ChunkError;
use crate::session::Session;

/// Configuration for where temp files live and how long an abandoned
/// session survives before the sweeper reclaims it.
#[derive(Clone)]
pub struct ReassemblerConfig {
    pub temp_dir: PathBuf,
    pub session_ttl: chrono::Duration,
}

impl Default for ReassemblerConfig {
    fn default() -> Self {
        Self { temp_dir: std::env::temp_dir(), session_ttl: chrono::Duration::minutes(5) }
    }
}

/// The keyed table of in-progress `LoadChunk` reassembly sessions.
///
/// Guarded by a `parking_lot::Mutex` rather than left unsynchronized:
/// the single-writer discipline (spec section 5) means `apply` never
/// contends with itself, but the TTL sweeper is expected to run as a
/// background task and must not race a concurrent `write`/`close`.
pub struct Reassembler {
    sessions: Mutex<HashMap<String, Session>>,
    config: ReassemblerConfig,
    clock: Arc<dyn Clock>,
}

impl Reassembler {
    pub fn new(config: ReassemblerConfig, clock: Arc<dyn Clock>) -> Self {
        Self { sessions: Mutex::new(HashMap::new()), config, clock }
    }

    fn fresh_tmp_path(&self) -> PathBuf {
        self.config.temp_dir.join(format!("rlog-load-{}.tmp", Uuid::new_v4()))
    }

    /// Ensures a session exists for `stream_id`, creating one with a
    /// fresh temp file if this is the first chunk seen for it.
    pub fn get_or_create(&self, stream_id: &str) -> Result<(), ChunkError> {
        let mut sessions = self.sessions.lock();
        if !sessions.contains_key(stream_id) {
            let tmp_path = self.fresh_tmp_path();
            let session = Session::create(stream_id.to_string(), tmp_path, self.clock.now())
                .map_err(|source| ChunkError::Io { stream_id: stream_id.to_string(), source })?;
            sessions.insert(stream_id.to_string(), session);
        }
        Ok(())
    }

    /// Appends `data` to the session for `stream_id`, creating it
    /// lazily if unseen. Verifies `sequence_num` follows the last
    /// accepted one; the first chunk for a stream establishes the
    /// baseline rather than being checked against anything, since a
    /// snapshot-truncated stream may legitimately start mid-sequence
    /// (spec section 4.4's critical edge case).
    pub fn write(&self, stream_id: &str, sequence_num: u64, data: &[u8]) -> Result<(), ChunkError> {
        self.get_or_create(stream_id)?;
        let mut sessions = self.sessions.lock();
        // Present because get_or_create just ensured it under the same lock discipline.
        let session = sessions
            .get_mut(stream_id)
            .ok_or_else(|| ChunkError::UnknownStream(stream_id.to_string()))?;

        if let Some(last) = session.last_seq {
            let expected = last + 1;
            if sequence_num != expected {
                return Err(ChunkError::OutOfOrder {
                    stream_id: stream_id.to_string(),
                    expected,
                    got: sequence_num,
                });
            }
        }

        session
            .append(data)
            .map_err(|source| ChunkError::Io { stream_id: stream_id.to_string(), source })?;
        session.last_seq = Some(sequence_num);
        Ok(())
    }

    /// Flushes the session's temp file and returns its path. Does not
    /// remove the table entry; call [`Reassembler::delete`] afterwards.
    pub fn close(&self, stream_id: &str) -> Result<PathBuf, ChunkError> {
        let mut sessions = self.sessions.lock();
        let session = sessions
            .get_mut(stream_id)
            .ok_or_else(|| ChunkError::UnknownStream(stream_id.to_string()))?;
        session
            .flush_and_sync()
            .map_err(|source| ChunkError::Io { stream_id: stream_id.to_string(), source })?;
        Ok(session.path().to_path_buf())
    }

    /// Forgets the session. Does not touch the temp file on disk —
    /// after a successful `close`, the dispatcher owns that path and is
    /// responsible for renaming or removing it.
    pub fn delete(&self, stream_id: &str) -> Option<PathBuf> {
        self.sessions.lock().remove(stream_id).map(|session| session.path().to_path_buf())
    }

    /// Convenience for the abort path: forgets the session and removes
    /// its temp file, since an aborted stream's partial data is never
    /// handed to anything.
    pub fn abort(&self, stream_id: &str) -> Result<(), ChunkError> {
        if let Some(path) = self.delete(stream_id) {
            remove_if_present(&path)
                .map_err(|source| ChunkError::Io { stream_id: stream_id.to_string(), source })?;
        }
        Ok(())
    }

    /// Removes sessions older than the configured TTL, deleting their
    /// temp files. Returns the paths removed, purely for logging by the
    /// caller; TTL expiry is not itself an error (spec section 4.3).
    pub fn sweep_expired(&self) -> Vec<PathBuf> {
        let now = self.clock.now();
        let ttl = self.config.session_ttl;
        let mut removed = Vec::new();
        let mut sessions = self.sessions.lock();
        sessions.retain(|stream_id, session| {
            if now - session.created_at <= ttl {
                return true;
            }
            warn!(stream_id = %stream_id, "evicting expired chunk reassembly session");
            if let Err(err) = remove_if_present(session.path()) {
                warn!(stream_id = %stream_id, error = %err, "failed to remove expired session's temp file");
            }
            removed.push(session.path().to_path_buf());
            false
        });
        removed
    }
}

fn remove_if_present(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
#[path = "reassembler_tests.rs"]
mod tests;

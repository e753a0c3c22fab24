// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// An in-progress file reassembly, keyed by `stream_id` in the
/// [`crate::Reassembler`]'s session table.
pub struct Session {
    pub stream_id: String,
    pub tmp_path: PathBuf,
    file: File,
    pub append_pos: u64,
    pub last_seq: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn create(
        stream_id: String,
        tmp_path: PathBuf,
        created_at: DateTime<Utc>,
    ) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).write(true).truncate(true).open(&tmp_path)?;
        Ok(Self { stream_id, tmp_path, file, append_pos: 0, last_seq: None, created_at })
    }

    pub(crate) fn append(&mut self, data: &[u8]) -> std::io::Result<()> {
        self.file.write_all(data)?;
        self.append_pos += data.len() as u64;
        Ok(())
    }

    /// Flushes and fsyncs the underlying file without consuming the
    /// session, so the caller can still look up `path()` afterwards and
    /// the table entry removal (`delete`) stays a separate step, per
    /// spec section 4.4's "close dechunker -> delete stream entry"
    /// ordering.
    pub(crate) fn flush_and_sync(&mut self) -> std::io::Result<()> {
        self.file.flush()?;
        self.file.sync_all()
    }

    pub fn path(&self) -> &Path {
        &self.tmp_path
    }
}

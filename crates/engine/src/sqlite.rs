// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rlog_core::{ExecuteRequest, ExecuteResult, MixedResultItem, QueryRequest, Rows};
use rusqlite::types::ValueRef;
use rusqlite::Connection;

use crate::error::EngineError;
use crate::handle::{EngineOptions, SqlEngine};

const SQLITE_MAGIC: &[u8; 16] = b"SQLite format 3\0";

/// The only `SqlEngine` implementation: a single `rusqlite::Connection`
/// to an on-disk database file.
pub struct SqliteEngine {
    conn: Connection,
    path: PathBuf,
    options: EngineOptions,
}

fn sidecar_paths(path: &Path) -> Vec<PathBuf> {
    let mut paths = vec![path.to_path_buf()];
    for suffix in ["-wal", "-shm", "-journal"] {
        let mut with_suffix = path.as_os_str().to_os_string();
        with_suffix.push(suffix);
        paths.push(PathBuf::from(with_suffix));
    }
    paths
}

fn value_to_json(value: ValueRef<'_>) -> serde_json::Value {
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(t) => serde_json::Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => {
            serde_json::Value::Array(b.iter().map(|byte| serde_json::Value::from(*byte)).collect())
        }
    }
}

impl SqlEngine for SqliteEngine {
    fn open(path: &Path, options: &EngineOptions) -> Result<Self, EngineError> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", options.foreign_keys)?;
        conn.pragma_update(None, "journal_mode", if options.wal_mode { "WAL" } else { "DELETE" })?;
        Ok(Self { conn, path: path.to_path_buf(), options: *options })
    }

    fn create_on_disk(data: &[u8], path: &Path, options: &EngineOptions) -> Result<Self, EngineError> {
        std::fs::write(path, data)?;
        Self::open(path, options)
    }

    fn query(&self, req: &QueryRequest) -> Result<Vec<Rows>, EngineError> {
        let mut out = Vec::with_capacity(req.statements.len());
        for sql in &req.statements {
            let start = Instant::now();
            let mut stmt = self.conn.prepare(sql)?;
            let columns: Vec<String> =
                stmt.column_names().iter().map(|name| name.to_string()).collect();
            let mut rows = stmt.query([])?;
            let mut values = Vec::new();
            while let Some(row) = rows.next()? {
                let mut tuple = Vec::with_capacity(columns.len());
                for i in 0..columns.len() {
                    tuple.push(value_to_json(row.get_ref(i)?));
                }
                values.push(tuple);
            }
            out.push(Rows { columns, values, time: start.elapsed().as_secs_f64() });
        }
        Ok(out)
    }

    fn execute(&self, req: &ExecuteRequest) -> Result<Vec<ExecuteResult>, EngineError> {
        let mut out = Vec::with_capacity(req.statements.len());
        for sql in &req.statements {
            let start = Instant::now();
            match self.conn.execute(sql, []) {
                Ok(changes) => out.push(ExecuteResult {
                    last_insert_id: self.conn.last_insert_rowid(),
                    rows_affected: changes as i64,
                    error: None,
                    time: start.elapsed().as_secs_f64(),
                }),
                Err(err) => {
                    out.push(ExecuteResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                        error: Some(err.to_string()),
                        time: start.elapsed().as_secs_f64(),
                    });
                    break;
                }
            }
        }
        Ok(out)
    }

    fn request(&self, req: &ExecuteRequest) -> Result<Vec<MixedResultItem>, EngineError> {
        let mut out = Vec::with_capacity(req.statements.len());
        for sql in &req.statements {
            let start = Instant::now();
            let mut stmt = match self.conn.prepare(sql) {
                Ok(stmt) => stmt,
                Err(err) => {
                    out.push(MixedResultItem::Error(err.to_string()));
                    break;
                }
            };
            if stmt.column_count() == 0 {
                match stmt.execute([]) {
                    Ok(changes) => out.push(MixedResultItem::Execute(ExecuteResult {
                        last_insert_id: self.conn.last_insert_rowid(),
                        rows_affected: changes as i64,
                        error: None,
                        time: start.elapsed().as_secs_f64(),
                    })),
                    Err(err) => {
                        out.push(MixedResultItem::Error(err.to_string()));
                        break;
                    }
                }
            } else {
                let columns: Vec<String> =
                    stmt.column_names().iter().map(|name| name.to_string()).collect();
                let result: rusqlite::Result<Vec<Vec<serde_json::Value>>> = (|| {
                    let mut rows = stmt.query([])?;
                    let mut values = Vec::new();
                    while let Some(row) = rows.next()? {
                        let mut tuple = Vec::with_capacity(columns.len());
                        for i in 0..columns.len() {
                            tuple.push(value_to_json(row.get_ref(i)?));
                        }
                        values.push(tuple);
                    }
                    Ok(values)
                })();
                match result {
                    Ok(values) => out.push(MixedResultItem::Rows(Rows {
                        columns,
                        values,
                        time: start.elapsed().as_secs_f64(),
                    })),
                    Err(err) => {
                        out.push(MixedResultItem::Error(err.to_string()));
                        break;
                    }
                }
            }
        }
        Ok(out)
    }

    fn close(self) -> Result<(), (Self, EngineError)> {
        let Self { conn, path, options } = self;
        match conn.close() {
            Ok(()) => Ok(()),
            Err((conn, err)) => Err((Self { conn, path, options }, EngineError::Sql(err))),
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn fk_enabled(&self) -> bool {
        self.options.foreign_keys
    }

    fn wal_enabled(&self) -> bool {
        self.options.wal_mode
    }

    fn is_valid_file(path: &Path) -> bool {
        let Ok(mut file) = std::fs::File::open(path) else {
            return false;
        };
        let mut header = [0u8; 16];
        match file.read_exact(&mut header) {
            Ok(()) => &header == SQLITE_MAGIC,
            Err(_) => false,
        }
    }

    fn remove_files(path: &Path) -> Result<(), EngineError> {
        for candidate in sidecar_paths(path) {
            match std::fs::remove_file(&candidate) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(EngineError::Io(err)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;

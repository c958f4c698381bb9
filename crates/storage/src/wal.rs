// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log of installation operations
//!
//! One JSON entry per line, each carrying a sequence number that increases by
//! one. A crash mid-append can leave a final line without its newline; that
//! torn tail is dropped on open. Damage anywhere else is an error.
//!
//! A failed append is rolled back to the previous length so the file never
//! holds an entry the caller was told did not land. If the rollback itself
//! fails the log refuses further appends.

use crate::Operation;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt entry at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },
    #[error("write-ahead log is unusable after a failed rollback")]
    Poisoned,
}

/// File operations the log depends on
trait LogFile: Write + Send {
    fn len(&self) -> io::Result<u64>;
    fn truncate(&mut self, len: u64) -> io::Result<()>;
    fn sync(&mut self) -> io::Result<()>;
}

impl LogFile for File {
    fn len(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WalEntry {
    seq: u64,
    op: Operation,
}

/// Append-only operation log
pub struct Wal {
    path: PathBuf,
    file: Box<dyn LogFile>,
    sequence: u64,
    poisoned: bool,
}

impl Wal {
    /// Open or create the log at `path`, returning it with the operations it
    /// already holds
    pub fn open(path: &Path) -> Result<(Self, Vec<Operation>), WalError> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;

        let mut content = String::new();
        file.read_to_string(&mut content)?;
        let (entries, valid_len) = parse(&content)?;

        if valid_len < content.len() {
            tracing::warn!(
                path = %path.display(),
                dropped_bytes = content.len() - valid_len,
                "dropping torn tail of write-ahead log"
            );
            file.set_len(valid_len as u64)?;
            file.sync_all()?;
        }

        let sequence = entries.last().map_or(0, |e| e.seq);
        let wal = Self {
            path: path.to_path_buf(),
            file: Box::new(file),
            sequence,
            poisoned: false,
        };
        Ok((wal, entries.into_iter().map(|e| e.op).collect()))
    }

    /// Operations in the log at `path`, without opening it for writing.
    /// A missing file is an empty log.
    pub fn replay(path: &Path) -> Result<Vec<Operation>, WalError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let (entries, _) = parse(&content)?;
        Ok(entries.into_iter().map(|e| e.op).collect())
    }

    /// Append `op` and sync it to disk, returning its sequence number.
    /// On error the log is left exactly as it was.
    pub fn append(&mut self, op: &Operation) -> Result<u64, WalError> {
        if self.poisoned {
            return Err(WalError::Poisoned);
        }

        let entry = WalEntry {
            seq: self.sequence + 1,
            op: op.clone(),
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let len = self.file.len()?;
        if let Err(e) = self.write_synced(line.as_bytes()) {
            self.roll_back(len);
            return Err(e.into());
        }
        self.sequence = entry.seq;
        Ok(entry.seq)
    }

    fn write_synced(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.file.write_all(bytes)?;
        self.file.sync()
    }

    fn roll_back(&mut self, len: u64) {
        let restored = self.file.truncate(len).and_then(|()| self.file.sync());
        if let Err(e) = restored {
            tracing::error!(
                path = %self.path.display(),
                error = %e,
                "write-ahead log rollback failed, refusing further appends"
            );
            self.poisoned = true;
        }
    }
}

impl std::fmt::Debug for Wal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wal")
            .field("path", &self.path)
            .field("sequence", &self.sequence)
            .field("poisoned", &self.poisoned)
            .finish()
    }
}

/// Parse complete entries, returning them with the byte length they cover
fn parse(content: &str) -> Result<(Vec<WalEntry>, usize), WalError> {
    let mut entries: Vec<WalEntry> = Vec::new();
    let mut offset = 0;

    for (index, raw) in content.split_inclusive('\n').enumerate() {
        let complete = raw.ends_with('\n');
        let line = raw.trim_end();
        if line.is_empty() {
            offset += raw.len();
            continue;
        }

        let entry: WalEntry = match serde_json::from_str(line) {
            Ok(entry) => entry,
            // Only an unterminated final line can be a torn write
            Err(_) if !complete => break,
            Err(e) => {
                return Err(WalError::Corrupt {
                    line: index + 1,
                    reason: e.to_string(),
                })
            }
        };

        let expected = entries.last().map_or(1, |prev| prev.seq + 1);
        if entry.seq != expected {
            return Err(WalError::Corrupt {
                line: index + 1,
                reason: format!("expected sequence {expected}, found {}", entry.seq),
            });
        }

        entries.push(entry);
        offset += raw.len();
    }

    Ok((entries, offset))
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;

//! JSON-lines file implementation of `RecordStore`.
//!
//! Each record is written as one compact JSON document followed by `\n`.
//! The file is opened in append mode and synced after every record, so a
//! record acknowledged by `append` survives a process crash. Existing lines
//! are never rewritten; a failed write is truncated back to the previous
//! end of file so the next append starts on a clean line.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use ethos_contracts::{
    audit::AuditRecord,
    error::{EthosError, EthosResult},
};
use ethos_core::traits::RecordStore;

/// The file operations `append_line` needs beyond `Write`.
trait LogFile: Write {
    fn current_len(&self) -> io::Result<u64>;
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
    fn sync(&mut self) -> io::Result<()>;
}

impl LogFile for File {
    fn current_len(&self) -> io::Result<u64> {
        self.metadata().map(|m| m.len())
    }

    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }
}

/// Write `line` in full and sync it, or leave the file at its old length.
fn append_line<F: LogFile>(file: &mut F, line: &[u8]) -> io::Result<()> {
    let len = file.current_len()?;
    if let Err(e) = file.write_all(line).and_then(|()| file.sync()) {
        if let Err(rollback) = file.truncate_to(len) {
            warn!(error = %rollback, len, "failed to truncate partial audit line");
        }
        return Err(e);
    }
    Ok(())
}

/// A durable, append-only record store backed by a single file.
#[derive(Debug)]
pub struct JsonlRecordStore {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlRecordStore {
    /// Open (or create) the log file at `path`, creating parent
    /// directories as needed.
    pub fn open(path: impl AsRef<Path>) -> EthosResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                EthosError::storage(format!(
                    "failed to create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                EthosError::storage(format!("failed to open log '{}': {}", path.display(), e))
            })?;

        debug!(path = %path.display(), "opened audit log file");

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for JsonlRecordStore {
    fn append(&self, record: &AuditRecord) -> EthosResult<()> {
        let mut line = serde_json::to_vec(record)
            .map_err(|e| EthosError::storage(format!("failed to encode record: {}", e)))?;
        line.push(b'\n');

        let mut file = self
            .file
            .lock()
            .map_err(|e| EthosError::storage(format!("log file lock poisoned: {}", e)))?;
        append_line(&mut *file, &line).map_err(|e| {
            EthosError::storage(format!(
                "failed to append to '{}': {}",
                self.path.display(),
                e
            ))
        })
    }

    fn scan(&self) -> EthosResult<Vec<AuditRecord>> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            EthosError::storage(format!("failed to read '{}': {}", self.path.display(), e))
        })?;

        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|e| {
                    EthosError::storage(format!(
                        "corrupt record at {}:{}: {}",
                        self.path.display(),
                        idx + 1,
                        e
                    ))
                })
            })
            .collect()
    }
}

//! Consuming side of an IPC directory
//!
//! An inbox is a directory other processes drop complete `*.json` files
//! into. Entries are listed in name order (names start with a millisecond
//! timestamp), read, parsed, and removed. Ordering across files is a
//! convenience only; callers must not depend on it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{NanoclawError, Result};

/// A directory of pending JSON files
#[derive(Debug, Clone)]
pub struct JsonInbox {
    dir: PathBuf,
}

impl JsonInbox {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Complete `*.json` files currently waiting, sorted by name
    ///
    /// A missing directory is an empty inbox. In-flight `.tmp` files are
    /// skipped.
    pub fn pending(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(NanoclawError::FileRead {
                    path: self.dir.clone(),
                    source: e,
                })
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_json_file(path))
            .collect();
        files.sort();
        Ok(files)
    }

    /// Read, parse and delete one entry
    ///
    /// On a parse error the file is left in place so the caller can
    /// quarantine it.
    pub fn take<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let value = read_json(path)?;
        remove_quietly(path);
        Ok(value)
    }
}

/// Whether a path names a finished IPC file
pub fn is_json_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

/// Read and parse a JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| NanoclawError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| NanoclawError::InvalidIpcFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Best-effort delete; a concurrent consumer may have removed it already
pub fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Failed to remove IPC file");
        }
    }
}

/// Move an unprocessable file into `errors_dir` as `<prefix>-<name>`
pub fn quarantine(path: &Path, errors_dir: &Path, prefix: &str) -> Result<PathBuf> {
    fs::create_dir_all(errors_dir).map_err(|e| NanoclawError::DirCreate {
        path: errors_dir.to_path_buf(),
        source: e,
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown.json".into());
    let dest = errors_dir.join(format!("{}-{}", prefix, name));

    fs::rename(path, &dest).map_err(|e| NanoclawError::FileWrite {
        path: dest.clone(),
        source: e,
    })?;
    debug!(from = %path.display(), to = %dest.display(), "Quarantined IPC file");
    Ok(dest)
}

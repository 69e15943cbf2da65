//! Atomic JSON file writes
//!
//! Every IPC file is written to `<final>.tmp` in the destination directory
//! and renamed into place, so readers polling the directory only ever see
//! complete files. Readers must ignore anything not ending in `.json`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::debug;

use crate::{NanoclawError, Result};

/// Suffix appended to the final file name while it is being written
pub const TEMP_SUFFIX: &str = ".tmp";

/// Length of the random token in generated names
const TOKEN_LEN: usize = 6;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Highest timestamp handed out so far; keeps stems non-decreasing
/// even if the wall clock steps backwards.
static LAST_MILLIS: AtomicU64 = AtomicU64::new(0);

/// Milliseconds since the Unix epoch, never lower than a previous call
pub fn timestamp_millis() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let prev = LAST_MILLIS.fetch_max(now, Ordering::Relaxed);
    prev.max(now)
}

/// Random lowercase base36 token
pub fn random_token(len: usize) -> String {
    (0..len)
        .map(|_| BASE36[fastrand::usize(..BASE36.len())] as char)
        .collect()
}

/// `<millis>-<token>`, used for IPC file names and request ids
pub fn unique_stem() -> String {
    format!("{}-{}", timestamp_millis(), random_token(TOKEN_LEN))
}

/// Temp path used while writing `path`
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

/// Serialize `value` as pretty JSON and atomically place it at `path`
///
/// The parent directory is created if missing.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| NanoclawError::DirCreate {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let data = serde_json::to_vec_pretty(value)?;
    let tmp = temp_path(path);

    let write_err = |e: std::io::Error| NanoclawError::FileWrite {
        path: tmp.clone(),
        source: e,
    };

    let file = File::create(&tmp).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&data).map_err(write_err)?;
    writer.flush().map_err(write_err)?;
    writer
        .into_inner()
        .map_err(|e| write_err(e.into_error()))?
        .sync_all()
        .map_err(write_err)?;

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(NanoclawError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        });
    }

    debug!(path = %path.display(), bytes = data.len(), "Wrote IPC file");
    Ok(())
}

/// Write `value` into `dir` under a fresh unique name
///
/// Returns the generated file name (not the full path).
pub fn write_ipc_file<T: Serialize + ?Sized>(dir: &Path, value: &T) -> Result<String> {
    let filename = format!("{}.json", unique_stem());
    write_json_atomic(&dir.join(&filename), value)?;
    Ok(filename)
}
